use devboard::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("devboard board move: rolled back");
    human.push_summary("active", "t1");
    human.push_block("To Do (1)\n    0. Write docs  [t1]\n");
    human.push_warning("board reloaded from the backend");
    human.push_next_step("devboard board show");

    let rendered = format_human(&human);
    assert!(rendered.starts_with("devboard board move: rolled back"));
    assert!(rendered.contains("active: t1"));
    assert!(rendered.contains("To Do (1)\n    0. Write docs  [t1]"));
    assert!(!rendered.contains("[t1]\n\n\n"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- board reloaded from the backend"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- devboard board show"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("devboard init: config already present");
    let rendered = format_human(&human);
    assert_eq!(rendered, "devboard init: config already present");
}
