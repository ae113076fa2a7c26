//! Standard RENDER picture formats.
//!
//! Servers advertise their picture formats by id only; clients find the
//! well-known layouts (ARGB32 for cursors) by matching depth and channel
//! masks against the `QueryPictFormats` reply.

use x11rb::protocol::render::{Directformat, PictType, Pictforminfo, QueryPictFormatsReply};

/// Well-known direct picture formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFormat {
    /// 32 bpp, 8 bits per channel, alpha in the top byte.
    Argb32,
    /// 24 bits of color in a 32-bit pixel, no alpha.
    Rgb24,
    /// 8-bit alpha only.
    A8,
    /// 4-bit alpha only.
    A4,
    /// 1-bit alpha only.
    A1,
}

impl StandardFormat {
    pub const ALL: [StandardFormat; 5] = [
        StandardFormat::Argb32,
        StandardFormat::Rgb24,
        StandardFormat::A8,
        StandardFormat::A4,
        StandardFormat::A1,
    ];

    pub fn depth(self) -> u8 {
        match self {
            StandardFormat::Argb32 => 32,
            StandardFormat::Rgb24 => 24,
            StandardFormat::A8 => 8,
            StandardFormat::A4 => 4,
            StandardFormat::A1 => 1,
        }
    }

    /// Channel layout as `(shift, mask)` pairs for red, green, blue, alpha.
    fn channels(self) -> [(u16, u16); 4] {
        match self {
            StandardFormat::Argb32 => [(16, 0xff), (8, 0xff), (0, 0xff), (24, 0xff)],
            StandardFormat::Rgb24 => [(16, 0xff), (8, 0xff), (0, 0xff), (0, 0x00)],
            StandardFormat::A8 => [(0, 0), (0, 0), (0, 0), (0, 0xff)],
            StandardFormat::A4 => [(0, 0), (0, 0), (0, 0), (0, 0x0f)],
            StandardFormat::A1 => [(0, 0), (0, 0), (0, 0), (0, 0x01)],
        }
    }

    /// Whether `info` describes this layout.
    pub fn matches(self, info: &Pictforminfo) -> bool {
        info.type_ == PictType::DIRECT
            && info.depth == self.depth()
            && direct_channels(&info.direct) == self.channels()
    }
}

fn direct_channels(direct: &Directformat) -> [(u16, u16); 4] {
    [
        (direct.red_shift, direct.red_mask),
        (direct.green_shift, direct.green_mask),
        (direct.blue_shift, direct.blue_mask),
        (direct.alpha_shift, direct.alpha_mask),
    ]
}

/// Index of the first format in `reply` matching `format`.
///
/// An index is returned instead of a reference so the result can be
/// stored next to the reply that owns the format list.
pub fn find_standard_format(reply: &QueryPictFormatsReply, format: StandardFormat) -> Option<usize> {
    reply.formats.iter().position(|info| format.matches(info))
}
