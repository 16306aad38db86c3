/// Rough token estimate: ~4 chars per token, rounded up so short prompts count.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}
