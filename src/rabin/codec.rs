// Base-27 text codec
// Maps strings to fixed-width integer units and back; blank is digit 0,
// 'a'..'z' are digits 1..26

use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::error::{RabinError, Result};
use crate::rabin::math::RabinInt;

/// Numeral radix of the text encoding: blank + 26 letters
pub const RADIX: u32 = 27;

/// Digit value of one input character. Space and underscore both read as
/// the blank digit so that decoded text (which renders blanks as '_') can
/// be fed back through `encode`.
fn code_for(ch: char) -> Result<u32> {
    match ch {
        ' ' | '_' => Ok(0),
        'a'..='z' => Ok(ch as u32 - 'a' as u32 + 1),
        _ => Err(RabinError::EncodingError(ch)),
    }
}

/// Character rendered for one decoded digit. Digits above 26 can only come
/// from a unit that exceeds 27^width; they are rendered as '?' to flag the
/// block rather than panic or wrap.
fn char_for(code: u32) -> char {
    match code {
        0 => '_',
        1..=26 => (b'A' + code as u8 - 1) as char,
        _ => '?',
    }
}

/// Encode text into base-27 units of `width` characters each.
///
/// Input is lower-cased first; the final chunk is right-padded with blanks
/// when the text length is not a multiple of `width`. Each chunk becomes
/// one integer via the positional formula sum(digit_i * 27^(width-1-i)).
pub fn encode(text: &str, width: u32) -> Result<Vec<RabinInt>> {
    let text = text.to_lowercase();
    let chars: Vec<char> = text.chars().collect();

    let mut units = Vec::new();
    for chunk in chars.chunks(width as usize) {
        let mut unit = RabinInt::zero();
        for position in 0..width as usize {
            // positions past the end of the chunk are padding blanks
            let digit = match chunk.get(position) {
                Some(&ch) => code_for(ch)?,
                None => 0,
            };
            unit = unit * RADIX + digit;
        }
        units.push(unit);
    }

    Ok(units)
}

/// Decode base-27 units back into text, `width` characters per unit.
///
/// Digits are extracted most-significant-first by division by descending
/// powers of 27. Digit 0 renders as '_', digit c as the uppercase letter
/// at offset c - 1. Callers are expected to pass units below 27^width;
/// out-of-range leading digits render as '?'.
pub fn decode(units: &[RabinInt], width: u32) -> String {
    let radix = RabinInt::from(RADIX);

    let mut text = String::with_capacity(units.len() * width as usize);
    for unit in units {
        let mut remainder = unit.clone();
        for exponent in (0..width).rev() {
            let place = radix.pow(exponent);
            let (digit, rest) = remainder.div_rem(&place);
            text.push(char_for(digit.to_u32().unwrap_or(RADIX)));
            remainder = rest;
        }
    }

    text
}
