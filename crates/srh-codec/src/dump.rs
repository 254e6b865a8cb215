//! Human-readable rendering of encoded headers.

/// Hex dump of `bytes`, four bytes per line.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(4)
        .map(|word| {
            word.iter()
                .map(|byte| format!("{byte:#04x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
