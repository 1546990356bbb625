use super::*;

fn pp() -> Preprocessor {
    Preprocessor::new(LangStandard::Sv2017)
}

#[test]
fn plain_text_round_trips() {
    let src = "module m;\n  wire w;\nendmodule\n";
    let mut p = pp();
    assert_eq!(p.preprocess_text(src, "t.v").unwrap(), src);
    assert_eq!(p.diagnostics().is_empty(), true);
}

#[test]
fn object_macro_expands_by_name() {
    let src = "`define WIDTH 32\nwire [WIDTH-1:0] bus;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\nwire [32-1:0] bus;\n");
}

#[test]
fn backtick_invocation_expands() {
    let src = "`define WIDTH 32\nwire [`WIDTH-1:0] bus;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\nwire [32-1:0] bus;\n");
}

#[test]
fn rescan_substitutes_chained_macros() {
    // `A expands to `B, which expands to 7 on rescan
    let src = "`define A `B\n`define B 7\n$info(`A);\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n\n$info(7);\n");
}

#[test]
fn recursive_macro_terminates() {
    let src = "`define X `X\n`X\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    // the hidden invocation passes through verbatim
    assert_eq!(out, "\n`X\n");
}

#[test]
fn function_like_arguments() {
    let src = "`define MAX(a,b) ((a) > (b) ? (a) : (b))\nassign o = `MAX(x+1, y);\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\nassign o = ((x+1) > (y) ? (x+1) : (y));\n");
}

#[test]
fn macro_arity_is_checked() {
    let src = "`define PAIR(a,b) a b\n`PAIR(1)\n";
    let mut p = pp();
    match p.preprocess_text(src, "t.v") {
        Err(VerilogError::MacroArity(name, expected, found)) => {
            assert_eq!(name, "PAIR");
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected MacroArity, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn stringification_in_body() {
    let src = "`define MSG(x) `\"val: x`\"\n$display(`MSG(7));\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n$display(\"val: 7\");\n");
}

#[test]
fn strings_shield_macro_names() {
    let src = "`define A 1\n$display(\"A `A\");\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n$display(\"A `A\");\n");
}

#[test]
fn comments_shield_macro_names() {
    let src = "`define A 1\n// A stays A\n/* `A too */\nA\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n// A stays A\n/* `A too */\n1\n");
}

#[test]
fn conditional_regions_become_blank_lines() {
    let src = "`define DEBUG 1\n`ifdef DEBUG\nkept;\n`else\ndropped;\n`endif\ntail;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n\nkept;\n\n\n\ntail;\n");
}

#[test]
fn ifndef_inverts() {
    let src = "`ifndef MISSING\nkept;\n`endif\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\nkept;\n\n");
}

#[test]
fn elsif_chains_take_first_match() {
    let src = "`define B 1\n`ifdef A\na;\n`elsif B\nb;\n`elsif C\nc;\n`else\nd;\n`endif\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n\n\n\nb;\n\n\n\n\n\n");
}

#[test]
fn line_numbers_survive_preprocessing() {
    // __LINE__ sentinels report original line numbers after earlier
    // directives and skipped regions have been blanked
    let src = "`define F\n`ifdef MISSING\nskipped\nskipped\n`endif\nx = __LINE__;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out.lines().nth(5), Some("x = 6;"));
}

#[test]
fn file_sentinel_expands() {
    let mut p = pp();
    let out = p.preprocess_text("s = __FILE__;\n", "dir/t.v").unwrap();
    assert_eq!(out, "s = \"dir/t.v\";\n");
}

#[test]
fn unterminated_ifdef_names_opening() {
    let src = "`ifdef A\nno end\n";
    let mut p = pp();
    match p.preprocess_text(src, "t.v") {
        Err(VerilogError::UnterminatedIfdef(word, origin, line)) => {
            assert_eq!(word, "ifdef");
            assert_eq!(origin, "t.v");
            assert_eq!(line, 1);
        }
        other => panic!("expected UnterminatedIfdef, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn dangling_directives_are_fatal() {
    let mut p = pp();
    assert_eq!(
        p.preprocess_text("`endif\n", "t.v"),
        Err(VerilogError::DanglingEndif)
    );
    let mut p = pp();
    assert_eq!(
        p.preprocess_text("`elsif A\n", "t.v"),
        Err(VerilogError::DanglingElse(String::from("elsif")))
    );
}

#[test]
fn balanced_conditionals_never_error() {
    let src = "`ifdef A\n`ifdef B\n`endif\n`else\n`endif\n";
    let mut p = pp();
    assert_eq!(p.preprocess_text(src, "t.v").is_ok(), true);
}

#[test]
fn undef_and_redefinition() {
    let src = "`define A 1\n`undef A\n`undef NEVER\nA\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n\n\nA\n");
    assert_eq!(p.diagnostics().is_empty(), true);

    let src = "`define A 1\n`define A 2\n";
    let mut p = pp();
    p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(p.diagnostics().has_warnings(), true);
}

#[test]
fn unknown_directive_passes_through_with_warning() {
    let src = "`pragma_custom on\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "`pragma_custom on\n");
    assert_eq!(p.diagnostics().has_warnings(), true);
}

#[test]
fn passthrough_directives_are_kept() {
    let src = "`timescale 1ns/1ps\n`celldefine\n`default_nettype none\n`endcelldefine\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, src);
}

#[test]
fn resetall_clears_source_defines_only() {
    let src = "`define FROM_SRC 1\n`resetall\n";
    let mut p = pp().define("FROM_CLI", "1");
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n`resetall\n");
    assert_eq!(p.defines().is_defined("FROM_CLI"), true);
    assert_eq!(p.defines().is_defined("FROM_SRC"), false);
}

#[test]
fn continued_define_preserves_line_count() {
    let src = "`define LONG first \\\nsecond\nafter = __LINE__;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    // the two directive lines survive as blanks; `after` is line 3
    assert_eq!(out, "\n\nafter = 3;\n");
    assert_eq!(p.defines().get("LONG").unwrap().body(), "first second");
}

#[test]
fn expansion_is_idempotent() {
    let src = "`define WIDTH 8\nwire [`WIDTH-1:0] a;\nwire [WIDTH-1:0] b;\n";
    let mut p = pp();
    let out1 = p.preprocess_text(src, "t.v").unwrap();
    // re-running the produced text with the same macro table changes nothing
    let mut p2 = pp().define("WIDTH", "8");
    let out2 = p2.preprocess_text(&out1, "t2.v").unwrap();
    assert_eq!(out1, out2);
}

#[test]
fn include_resolution_and_markers() {
    let root = tempfile::tempdir().unwrap();
    let inc = root.path().join("inc");
    std::fs::create_dir(&inc).unwrap();
    std::fs::write(inc.join("hdr.vh"), "`define FROM_HDR 1\nwire h;\n").unwrap();
    let top = root.path().join("top.v");
    std::fs::write(&top, "`include \"hdr.vh\"\nwire t;\n").unwrap();

    let mut p = pp().include_path(inc);
    let out = p.preprocess_file(top.to_str().unwrap()).unwrap();
    assert_eq!(p.defines().is_defined("FROM_HDR"), true);
    // entry marker for the include, return marker back to top.v
    assert_eq!(out.contains("hdr.vh\" 1"), true);
    assert_eq!(out.contains("top.v\" 2"), true);
    assert_eq!(out.contains("wire h;"), true);
    assert_eq!(out.contains("wire t;"), true);
    // the root file is announced first
    assert_eq!(out.starts_with("`line 1 \""), true);
}

#[test]
fn include_beside_source_wins_over_include_path() {
    let root = tempfile::tempdir().unwrap();
    let inc = root.path().join("inc");
    std::fs::create_dir(&inc).unwrap();
    std::fs::write(inc.join("a.vh"), "from_inc\n").unwrap();
    std::fs::write(root.path().join("a.vh"), "beside_source\n").unwrap();
    let top = root.path().join("top.v");
    std::fs::write(&top, "`include \"a.vh\"\n").unwrap();

    let mut p = pp().include_path(inc);
    let out = p.preprocess_file(top.to_str().unwrap()).unwrap();
    assert_eq!(out.contains("beside_source"), true);
}

#[test]
fn missing_include_lists_searched_paths() {
    let root = tempfile::tempdir().unwrap();
    let top = root.path().join("top.v");
    std::fs::write(&top, "`include \"ghost.vh\"\n").unwrap();
    let mut p = pp().include_path(root.path().join("inc"));
    match p.preprocess_file(top.to_str().unwrap()) {
        Err(VerilogError::IncludeNotFound(name, searched)) => {
            assert_eq!(name, "ghost.vh");
            assert_eq!(searched.contains("inc"), true);
        }
        other => panic!("expected IncludeNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn include_depth_is_limited() {
    let root = tempfile::tempdir().unwrap();
    // a file that includes itself forever
    let loopy = root.path().join("loop.vh");
    std::fs::write(&loopy, "`include \"loop.vh\"\n").unwrap();
    let mut p = pp().include_limit(10);
    assert_eq!(
        p.preprocess_file(loopy.to_str().unwrap()),
        Err(VerilogError::IncludeDepthExceeded(10))
    );
}

#[test]
fn skipped_regions_do_not_define_or_include() {
    let src = "`ifdef MISSING\n`define HIDDEN 1\n`include \"nope.vh\"\n`endif\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out, "\n\n\n\n");
    assert_eq!(p.defines().is_defined("HIDDEN"), false);
}

#[test]
fn line_override_beyond_file_end_warns() {
    let root = tempfile::tempdir().unwrap();
    let top = root.path().join("top.v");
    // the file claims a position far past its own recorded line count
    let marker = format!("`line 999 \"{}\" 0\nwire w;\n", top.display());
    std::fs::write(&top, &marker).unwrap();
    let mut p = pp();
    let out = p.preprocess_file(top.to_str().unwrap()).unwrap();
    assert_eq!(out.contains("wire w;"), true);
    assert_eq!(
        p.diagnostics()
            .iter()
            .filter(|d| d.message().contains("beyond the end") == true)
            .count(),
        1
    );
    // an in-bounds override stays silent
    let ok = root.path().join("ok.v");
    let marker = format!("`line 2 \"{}\" 0\nwire v;\n", ok.display());
    std::fs::write(&ok, &marker).unwrap();
    let mut p = pp();
    p.preprocess_file(ok.to_str().unwrap()).unwrap();
    assert_eq!(p.diagnostics().is_empty(), true);
}

#[test]
fn line_override_adjusts_sentinels() {
    let src = "`line 100 \"other.v\" 0\nx = __LINE__;\nf = __FILE__;\n";
    let mut p = pp();
    let out = p.preprocess_text(src, "t.v").unwrap();
    assert_eq!(out.contains("x = 100;"), true);
    assert_eq!(out.contains("f = \"other.v\";"), true);
    // the marker itself is passed through
    assert_eq!(out.contains("`line 100 \"other.v\" 0"), true);
}
