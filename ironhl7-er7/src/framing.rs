/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! MLLP framing bytes.
//!
//! A message delivered over MLLP is wrapped as `<VT> message <FS><CR>`. The
//! codec accepts messages with or without this wrapper and never emits it.

use tracing::debug;

/// MLLP start-of-block byte (vertical tab).
pub const START_BLOCK: u8 = 0x0B;

/// MLLP end-of-block byte (file separator).
pub const END_BLOCK: u8 = 0x1C;

const START_BLOCK_CHAR: char = START_BLOCK as char;
const END_BLOCK_CHAR: char = END_BLOCK as char;
const TRAILER: &str = "\u{1c}\r";

/// Skips a single leading start-of-block byte.
#[inline]
#[must_use]
pub fn skip_start_block(buffer: &[u8]) -> &[u8] {
    buffer.strip_prefix(&[START_BLOCK]).unwrap_or(buffer)
}

/// Removes MLLP framing from decoded message text.
///
/// 1. A single leading start-of-block character is dropped.
/// 2. A trailing end-of-block plus carriage return is dropped.
/// 3. Anything from a remaining end-of-block character onward is discarded.
///
/// Step 3 deliberately tolerates trailing garbage after a stray end-of-block
/// instead of reporting a corrupt message.
#[must_use]
pub fn strip_framing(text: &str) -> &str {
    let text = text.strip_prefix(START_BLOCK_CHAR).unwrap_or(text);
    let text = text.strip_suffix(TRAILER).unwrap_or(text);
    match text.find(END_BLOCK_CHAR) {
        Some(pos) => {
            debug!(
                offset = pos,
                discarded = text.len() - pos,
                "truncating message at end-of-block byte"
            );
            &text[..pos]
        }
        None => text,
    }
}
