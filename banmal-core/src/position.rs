//! Token offsets within the sentence text

use crate::token::Token;

/// A token with its byte span in the owning sentence
///
/// `start == end` means the surface could not be located.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedToken<'t> {
    pub token: &'t Token,
    pub start: usize,
    pub end: usize,
}

impl PositionedToken<'_> {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Locate every token's surface in `sentence`, preserving token order
///
/// Searches forward from a cursor that only advances on a match. A surface
/// not found after the cursor is retried from the start of the sentence, and
/// failing that gets a zero-width span at the cursor. The first match wins;
/// repeated surfaces are not disambiguated further.
pub fn locate<'t>(sentence: &str, tokens: &'t [Token]) -> Vec<PositionedToken<'t>> {
    let mut cursor = 0;

    tokens
        .iter()
        .map(|token| {
            let surface = token.surface.as_str();
            let found = if surface.is_empty() {
                None
            } else {
                sentence[cursor..]
                    .find(surface)
                    .map(|offset| cursor + offset)
                    .or_else(|| sentence.find(surface))
            };

            match found {
                Some(start) => {
                    let end = start + surface.len();
                    cursor = end;
                    PositionedToken { token, start, end }
                }
                None => {
                    tracing::trace!(surface, cursor, "surface not found in sentence");
                    PositionedToken {
                        token,
                        start: cursor,
                        end: cursor,
                    }
                }
            }
        })
        .collect()
}
