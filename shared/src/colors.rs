/// Fill color for an earthquake magnitude.
///
/// Thresholds are checked high to low with strict greater-than comparisons,
/// so a magnitude sitting exactly on a boundary falls into the lower band.
/// Any real input is accepted; everything at or below 1 (including negative
/// magnitudes) is green.
pub fn magnitude_color(magnitude: f64) -> &'static str {
    if magnitude > 5.0 {
        "red"
    } else if magnitude > 4.0 {
        "#E64A19"
    } else if magnitude > 3.0 {
        "#EF6C00"
    } else if magnitude > 2.0 {
        "#FFA000"
    } else if magnitude > 1.0 {
        "#FFF176"
    } else {
        "#81C784"
    }
}
