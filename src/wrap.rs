/// Greedy word wrap over a single run of text.
///
/// Every step breaks at the last space within the first `width` characters,
/// even when the remainder would already fit. Each chunk is at most `width`
/// characters unless a token has no space within reach, in which case the
/// whole remainder is emitted as-is rather than split mid-word. A `width` of
/// zero or below disables wrapping.
pub fn wrap(text: &str, width: i64) -> Vec<&str> {
    let width = match usize::try_from(width) {
        Ok(w) if w > 0 => w,
        _ => return vec![text],
    };

    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        // Byte offset just past the first `width` chars, or the end of the text.
        let window_end = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(idx, _)| idx);

        match rest[..window_end].rfind(' ') {
            Some(p) => {
                chunks.push(&rest[..p]);
                rest = &rest[p + 1..];
            }
            None => {
                chunks.push(rest);
                break;
            }
        }
    }
    chunks
}
