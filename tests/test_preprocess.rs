use ctools::preprocess::{ScanState, remove_comments, strip_line};

#[test]
fn no_comments() {
    let input = "
    int main(void) {
        return 2;
    }
    ";
    let mut result = remove_comments(input);
    result.retain(|c| !c.is_ascii_whitespace());

    let mut expected = "
    int main(void) {
        return 2;
    }
    "
    .to_string();
    expected.retain(|c| !c.is_ascii_whitespace());
    assert_eq!(result, expected);
}

#[test]
fn remove_two_single_line_comments() {
    let input = "
    // this is a comment
    int main(void) {
        return 2;
        // this is the second comment
    }
    ";
    let result = remove_comments(input);
    let expected = "    int main(void) {\n        return 2;\n    }";
    assert_eq!(result, expected);
}

#[test]
fn remove_inline_comment() {
    assert_eq!(remove_comments("int x = 5; // set x"), "int x = 5;");
}

#[test]
fn remove_multi_line_comments() {
    let input = "
    int main(void) {
    /* this is a comment that
     * goes through multiple
     * lines
     */
        return 2;
    }
    ";
    let result = remove_comments(input);
    let expected = "    int main(void) {\n        return 2;\n    }";
    assert_eq!(result, expected);
}

#[test]
fn block_comment_spanning_lines() {
    assert_eq!(remove_comments("/* start\nmiddle\nend */\ncode();"), "code();");
}

#[test]
fn char_literal_slash() {
    assert_eq!(remove_comments("char c = '/';"), "char c = '/';");
}

#[test]
fn comment_markers_inside_strings() {
    let input = r#"const char *url = "http://example.com/*path*/"; // link"#;
    let expected = r#"const char *url = "http://example.com/*path*/";"#;
    assert_eq!(remove_comments(input), expected);
}

#[test]
fn escaped_quotes_do_not_end_literals() {
    let input = r#"printf("say \"hi\" // still text"); // gone"#;
    let expected = r#"printf("say \"hi\" // still text");"#;
    assert_eq!(remove_comments(input), expected);

    let input = r"char q = '\''; /* quote */";
    assert_eq!(remove_comments(input), r"char q = '\'';");
}

#[test]
fn double_quote_char_literal() {
    let input = r#"if (c == '"') { /* quote */ n++; } // count"#;
    let expected = r#"if (c == '"') {  n++; }"#;
    assert_eq!(remove_comments(input), expected);
}

#[test]
fn every_block_comment_on_a_line() {
    assert_eq!(remove_comments("int /* a */ x /* b */ = 1;"), "int  x  = 1;");
}

#[test]
fn line_comment_inside_block_comment() {
    assert_eq!(remove_comments("/* see // below */ int y;"), " int y;");
}

#[test]
fn block_comment_reopened_after_close() {
    let input = "a();\n/* one\n*/ b(); /* two\nstill two */ c();\nd();";
    assert_eq!(remove_comments(input), "a();\n b();\n c();\nd();");
}

#[test]
fn blank_lines_are_dropped() {
    let input = "int a;\n\n   \n// note\nint b;   \n\t\n";
    let result = remove_comments(input);
    assert_eq!(result, "int a;\nint b;");
    assert!(result.lines().all(|line| !line.trim().is_empty()));
}

#[test]
fn blank_input_is_unchanged() {
    assert_eq!(remove_comments(""), "");
    assert_eq!(remove_comments("  \n\t\n"), "  \n\t\n");
}

#[test]
fn stripping_twice_changes_nothing() {
    let input = "#include <stdio.h>\n\n// entry\nint main(void) { /* body */\n    puts(\"/* hi */\");\n    return 0;\n}\n";
    let once = remove_comments(input);
    assert_eq!(once, "#include <stdio.h>\nint main(void) {\n    puts(\"/* hi */\");\n    return 0;\n}");
    assert_eq!(remove_comments(&once), once);
}

#[test]
fn crlf_line_endings() {
    assert_eq!(remove_comments("a(); // x\r\nb();\r\n"), "a();\nb();");
}

#[test]
fn strip_line_carries_state() {
    let (line, state) = strip_line("x(); /* open", ScanState::Normal);
    assert_eq!(line.as_deref(), Some("x();"));
    assert_eq!(state, ScanState::InBlockComment);

    let (line, state) = strip_line("inside // still comment", state);
    assert_eq!(line, None);
    assert_eq!(state, ScanState::InBlockComment);

    let (line, state) = strip_line("done */ y(); // tail", state);
    assert_eq!(line.as_deref(), Some(" y();"));
    assert_eq!(state, ScanState::Normal);
}
