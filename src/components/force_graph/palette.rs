//! Category colors.
//!
//! A category maps to a palette slot through a stable hash, so the result
//! does not depend on the order categories are first seen in.

/// d3 "category10".
pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a(bytes: &[u8]) -> u32 {
	bytes
		.iter()
		.fold(FNV_OFFSET, |hash, &b| (hash ^ b as u32).wrapping_mul(FNV_PRIME))
}

/// Palette slot for `category`. Categories beyond the palette size wrap and
/// share slots. An empty palette always yields 0.
pub fn color_for(category: &str, palette_size: usize) -> usize {
	if palette_size == 0 {
		return 0;
	}
	fnv1a(category.as_bytes()) as usize % palette_size
}

/// CSS color for `category` from [`COLORS`].
pub fn category_color(category: &str) -> &'static str {
	COLORS[color_for(category, COLORS.len())]
}
