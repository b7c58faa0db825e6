//! Parse a small program and re-format it.

use srcfront::{Definition, Node};

fn main() {
    let input = "\
export fn area(w, h) { return w*h; }
var total = area(3, h = 4)+1;
while (total > 0) { total -= 5; }
";

    let nodes = srcfront::parse_str(input).expect("parse failed");

    println!("Items: {}", nodes.len());
    for node in &nodes {
        match node {
            Node::Definition(definition) => println!("  Definition: {}", definition.name()),
            Node::Statement(statement) => println!("  Statement: {statement:?}"),
            Node::Expression(expression) => println!("  Expression: {expression:?}"),
        }
    }

    let forward: Vec<&Definition> = nodes
        .iter()
        .filter_map(|node| match node {
            Node::Definition(definition) if definition.is_forward() => Some(definition),
            _ => None,
        })
        .collect();
    println!("Forward declarations: {}", forward.len());

    let output = srcfront::format(&nodes);
    println!("\nFormatted output:\n{output}");
}
