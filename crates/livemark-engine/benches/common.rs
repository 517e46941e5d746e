// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn sample_lines() -> Vec<&'static str> {
    vec![
        "# Title",
        "   ### Indented heading",
        "- bullet item",
        "12. ordered item",
        "[x] finished task",
        "> quoted text",
        "***",
        "* * *",
        "*-*",
        "plain paragraph with **bold** and `code` spans",
    ]
}

#[allow(dead_code)]
pub fn typing_script(lines: usize) -> String {
    let base = "- item with **bold** text\n";
    base.repeat(lines)
}
