use crate::data::example::Example;

/// The 4-row XOR truth table with a single output.
pub fn xor() -> Vec<Example> {
    vec![
        Example::from_static(&[0.0, 0.0], &[0]),
        Example::from_static(&[0.0, 1.0], &[1]),
        Example::from_static(&[1.0, 0.0], &[1]),
        Example::from_static(&[1.0, 1.0], &[0]),
    ]
}

/// `n` points on a grid over [0, 1]², labelled 1 when x > y.
pub fn diagonal(n: usize) -> Vec<Example> {
    let side = (n as f64).sqrt().ceil().max(2.0) as usize;
    (0..n)
        .map(|i| {
            let x = (i % side) as f64 / (side - 1) as f64;
            let y = ((i / side) % side) as f64 / (side - 1) as f64;
            // Points on the diagonal are moved off it so no target sits on the boundary.
            let y = if x == y { (y - 0.5 / side as f64).abs() } else { y };
            Example::from_static(&[x, y], &[u8::from(x > y)])
        })
        .collect()
}
