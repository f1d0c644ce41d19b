//! Methods command - list the detection methods.

use anyhow::Result;
use veracity_core::{standard_methods, DetectionMethod, MediaKind, MethodSelection};

/// Run the methods command.
#[allow(clippy::unnecessary_wraps)]
pub fn run() -> Result<()> {
    let methods = standard_methods(MethodSelection::default(), 0);

    for method in &methods {
        println!("{}", describe(method.as_ref()));
    }

    println!();
    println!("{} detection methods", methods.len());

    Ok(())
}

/// One listing line: name, category and applicable kinds.
fn describe(method: &dyn DetectionMethod) -> String {
    let kinds: Vec<_> = MediaKind::ALL
        .iter()
        .filter(|kind| method.applies_to(**kind))
        .map(|kind| kind.as_str())
        .collect();
    format!(
        "  {:<26} {:<9} {}",
        method.name(),
        method.category().as_str(),
        kinds.join(", ")
    )
}
