use crate::node::Fragment;
use crate::parsing::inline::{Cursor, InlineContentParser};
use crate::parsing::text::decode_entity;

/// Named and numeric character references. Unknown names stay literal.
pub struct EntityParser;

impl EntityParser {
    const MAX_HEX_DIGITS: usize = 6;
    const MAX_DECIMAL_DIGITS: usize = 7;
}

impl InlineContentParser for EntityParser {
    fn trigger_chars(&self) -> &[char] {
        &['&']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        let start = cur.pos();
        cur.bump();

        let complete = if cur.next_if(b'#') {
            if cur.next_if(b'x') || cur.next_if(b'X') {
                let digits = cur.match_while(|b| b.is_ascii_hexdigit());
                (1..=Self::MAX_HEX_DIGITS).contains(&digits) && cur.next_if(b';')
            } else {
                let digits = cur.match_while(|b| b.is_ascii_digit());
                (1..=Self::MAX_DECIMAL_DIGITS).contains(&digits) && cur.next_if(b';')
            }
        } else {
            cur.match_while(|b| b.is_ascii_alphanumeric()) > 0 && cur.next_if(b';')
        };
        if !complete {
            return None;
        }

        let entity = cur.slice(start, cur.pos());
        Some(Fragment::text(
            decode_entity(entity).unwrap_or_else(|| entity.to_string()),
        ))
    }
}
