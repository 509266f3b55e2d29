use crate::transforms::registry;

/// Print every registered transform with its description.
pub fn list_transforms() {
    let units: Vec<_> = registry().iter().collect();
    let width = units.iter().map(|u| u.name().len()).max().unwrap_or(0);
    println!("Available transforms:");
    for unit in units {
        println!("  {:width$}  {}", unit.name(), unit.description(), width = width);
    }
}
