// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Terminal output styling

use colored::{Color, Colorize};

use crate::report::Section;

/// Commands, paths and URLs inside prose
pub fn code(msg: &str) -> colored::ColoredString {
    msg.cyan()
}

/// False under `NO_COLOR` or when stdout is not a terminal
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term()
}

pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "═".repeat(title.chars().count().max(40)));
}

pub fn print_section(title: &str) {
    println!();
    println!("{}:", title.bold());
}

fn print_marked(mark: &str, color: Color, msg: &str) {
    println!("  {} {}", mark.color(color), msg);
}

pub fn print_success(msg: &str) {
    print_marked("✓", Color::Green, msg);
}

pub fn print_error(msg: &str) {
    print_marked("✗", Color::Red, msg);
}

pub fn print_warning(msg: &str) {
    print_marked("⚠", Color::Yellow, msg);
}

pub fn print_info(msg: &str) {
    print_marked("→", Color::Blue, msg);
}

/// Print one block of a generated plan. Headings lose their `#` markers.
pub fn print_plan_section(section: &Section) {
    println!();
    match section {
        Section::Heading(text) => {
            println!("{}", text.trim_start_matches('#').trim().bold().cyan())
        }
        Section::Body(text) => println!("{}", text),
    }
}
