//! Integration tests for the BML parser and query API

use rstest::rstest;

use bmlgen::domain::{parse, parse_lines, Document, SyntaxErrorKind, TreeNodeConvert};
use bmlgen::util::testing::{init_test_setup, GAMES_MANIFEST};

/// Names and data of every node in preorder, with depth.
fn outline(doc: &Document) -> Vec<(usize, String, Option<String>)> {
    fn walk(node: bmlgen::NodeRef<'_>, depth: usize, out: &mut Vec<(usize, String, Option<String>)>) {
        for child in node.children() {
            out.push((depth, child.name().to_string(), child.data().map(str::to_string)));
            walk(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(doc.root(), 0, &mut out);
    out
}

#[test]
fn given_same_input_when_parsing_twice_then_identical_trees() {
    init_test_setup();
    let first = parse(GAMES_MANIFEST).unwrap();
    let second = parse(GAMES_MANIFEST).unwrap();
    assert_eq!(outline(&first), outline(&second));
    assert_eq!(
        first.to_tree_string().to_string(),
        second.to_tree_string().to_string()
    );
}

#[test]
fn given_key_value_pairs_when_parsing_then_children_in_order() {
    let doc = parse("memory type=ROM size=0x80000 content=Program").unwrap();
    let memory = doc.path("memory").unwrap();

    let pairs: Vec<_> = memory.children().map(|c| (c.name(), c.text())).collect();
    assert_eq!(
        pairs,
        vec![("type", "ROM"), ("size", "0x80000"), ("content", "Program")]
    );
}

#[rstest]
#[case(r#"label name="Super Mario World""#, "Super Mario World")]
#[case(r#"label name="""#, "")]
#[case(r#"label name="a=b c""#, "a=b c")]
#[case("label name=bare", "bare")]
fn given_pair_value_when_parsing_then_quotes_stripped(#[case] text: &str, #[case] expected: &str) {
    let doc = parse(text).unwrap();
    assert_eq!(doc.path_chain("label", &["name"]).unwrap().text(), expected);
}

#[test]
fn given_nested_lines_when_parsing_then_path_chain_reaches_leaf() {
    let doc = parse("game\n  board\n    memory\n      type: ROM").unwrap();

    let leaf = doc.path_chain("game", &["board", "memory", "type"]).unwrap();
    assert_eq!(leaf.text(), "ROM");
    assert_eq!(leaf.qualified_name(), "game.board.memory.type");
}

#[test]
fn given_equal_indent_lines_when_parsing_then_siblings() {
    let doc = parse("game\n  name: A\n  region: NA\ngame\n  name: B").unwrap();

    let games = doc.elements("game");
    assert_eq!(games.len(), 2);
    let first: Vec<_> = games[0].children().map(|c| c.name()).collect();
    assert_eq!(first, vec!["name", "region"]);
    assert_eq!(games[1].path("name").unwrap().text(), "B");
}

#[test]
fn given_block_continuation_when_parsing_then_segments_joined_with_newline() {
    let doc = parse("note\n  :line one\n  :line two\n  :").unwrap();
    assert_eq!(doc.path("note").unwrap().text(), "line one\nline two\n");
}

#[test]
fn given_missing_node_when_querying_then_none_distinct_from_empty_data() {
    let doc = parse("game\n  name").unwrap();
    let game = doc.path("game").unwrap();

    let name = game.path("name").unwrap();
    assert_eq!(name.data(), None);
    assert_eq!(name.text(), "");
    assert!(game.path("region").is_none());
    assert!(game.elements("region").is_empty());
}

#[rstest]
#[case("game\n  memory key=", SyntaxErrorKind::MissingPairValue, 2, 14)]
#[case("game\n  memory key=\"open", SyntaxErrorKind::MissingPairValue, 2, 14)]
#[case("node !x", SyntaxErrorKind::MissingPairKey, 1, 6)]
#[case("node a=1 =2", SyntaxErrorKind::MissingPairKey, 1, 10)]
#[case("!node", SyntaxErrorKind::MissingNodeName, 1, 1)]
#[case("game\n\n  \"quoted\"", SyntaxErrorKind::MissingNodeName, 3, 3)]
fn given_malformed_line_when_parsing_then_error_names_expected_token(
    #[case] text: &str,
    #[case] kind: SyntaxErrorKind,
    #[case] line_number: usize,
    #[case] column: usize,
) {
    let err = parse(text).unwrap_err();
    assert_eq!(err.kind, kind);
    assert_eq!(err.line_number, line_number);
    assert_eq!(err.column, column);
}

#[test]
fn given_syntax_error_when_displaying_then_message_has_location() {
    let err = parse("game\n  memory key=").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected pair value at line 2, column 14: \"  memory key=\""
    );
}

#[test]
fn given_crlf_input_when_parsing_then_same_as_lf() {
    let lf = parse(GAMES_MANIFEST).unwrap();
    let crlf = parse(&GAMES_MANIFEST.replace('\n', "\r\n")).unwrap();
    assert_eq!(outline(&lf), outline(&crlf));
}

#[test]
fn given_blank_and_whitespace_lines_when_parsing_then_ignored() {
    let doc = parse("\n  \t\ngame\n\t\n  name: A\n \r\n").unwrap();
    assert_eq!(doc.path_chain("game", &["name"]).unwrap().text(), "A");
    assert_eq!(doc.len(), 3);
}

#[test]
fn given_line_iterator_when_parsing_lines_then_same_as_text() {
    let lines = vec!["game".to_string(), "  name: A".to_string()];
    let from_lines = parse_lines(lines).unwrap();
    let from_text = parse("game\n  name: A").unwrap();
    assert_eq!(outline(&from_lines), outline(&from_text));
}

#[test]
fn given_tab_indentation_when_parsing_then_prefix_must_match_exactly() {
    // "\t" then "  " are different prefixes: the third line closes the level of "b"
    let doc = parse("a\n\tb\n  c").unwrap();
    let tops: Vec<_> = doc.root().children().map(|c| c.name()).collect();
    assert_eq!(tops, vec!["a", "c"]);
    assert!(doc.path_chain("a", &["b"]).is_some());
}

#[test]
fn given_document_when_iterating_then_preorder() {
    let doc = parse("a\n  b\n  c\nd").unwrap();
    let names: Vec<_> = doc.iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(doc.depth(), 3);
}

#[test]
fn given_dedent_between_open_levels_when_parsing_then_outer_prefix_kept() {
    // "    e" matches the innermost "    " and closes one level; "  f" then stays under "a"
    let doc = parse("a\n  b\n      c\n    e\n  f").unwrap();

    let tops: Vec<_> = doc.root().children().map(|c| c.name()).collect();
    assert_eq!(tops, vec!["a"]);
    let a: Vec<_> = doc.path("a").unwrap().children().map(|c| c.name()).collect();
    assert_eq!(a, vec!["b", "e", "f"]);
    assert!(doc.path_chain("a", &["b", "c"]).is_some());
}
