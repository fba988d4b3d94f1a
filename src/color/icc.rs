use crate::foundation::error::{PixgraphError, PixgraphResult};

const HEADER_LEN: usize = 128;
const TAG_ENTRY_LEN: usize = 12;

/// What the engine needs to know about an ICC profile: whether it describes RGB data and how to
/// name the resulting space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IccSummary {
    pub(crate) description: Option<String>,
}

pub(crate) fn parse_profile(bytes: &[u8]) -> PixgraphResult<IccSummary> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(PixgraphError::unresolved("icc profile is truncated"));
    }
    let declared = be_u32(bytes, 0)? as usize;
    if declared > bytes.len() || declared < HEADER_LEN {
        return Err(PixgraphError::unresolved(format!(
            "icc profile declares {declared} bytes but {} were supplied",
            bytes.len()
        )));
    }
    if &bytes[36..40] != b"acsp" {
        return Err(PixgraphError::unresolved("icc profile signature missing"));
    }
    if &bytes[16..20] != b"RGB " {
        return Err(PixgraphError::unresolved(format!(
            "icc profile data space {:?} is not RGB",
            String::from_utf8_lossy(&bytes[16..20])
        )));
    }

    let bytes = &bytes[..declared];
    let tag_count = be_u32(bytes, HEADER_LEN)? as usize;
    let mut description = None;
    for i in 0..tag_count {
        let entry = HEADER_LEN + 4 + i * TAG_ENTRY_LEN;
        if entry + TAG_ENTRY_LEN > bytes.len() {
            return Err(PixgraphError::unresolved("icc tag table is truncated"));
        }
        if &bytes[entry..entry + 4] != b"desc" {
            continue;
        }
        let offset = be_u32(bytes, entry + 4)? as usize;
        let size = be_u32(bytes, entry + 8)? as usize;
        let tag = offset
            .checked_add(size)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| PixgraphError::unresolved("icc desc tag out of range"))?;
        description = read_description(tag);
        break;
    }
    Ok(IccSummary { description })
}

fn read_description(tag: &[u8]) -> Option<String> {
    let kind = tag.get(0..4)?;
    match kind {
        // ICC v2 textDescriptionType: u32 ASCII length (with NUL) then the ASCII bytes.
        b"desc" => {
            let len = be_u32(tag, 8).ok()? as usize;
            let ascii = tag.get(12..12usize.checked_add(len)?)?;
            let text = ascii.split(|b| *b == 0).next()?;
            non_empty(String::from_utf8_lossy(text).trim().to_string())
        }
        // ICC v4 multiLocalizedUnicodeType: first record only.
        b"mluc" => {
            let records = be_u32(tag, 8).ok()?;
            if records == 0 {
                return None;
            }
            let len = be_u32(tag, 20).ok()? as usize;
            let offset = be_u32(tag, 24).ok()? as usize;
            let raw = tag.get(offset..offset.checked_add(len)?)?;
            let units = raw
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect::<Vec<_>>();
            non_empty(String::from_utf16_lossy(&units).trim().to_string())
        }
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn be_u32(bytes: &[u8], at: usize) -> PixgraphResult<u32> {
    let b = at
        .checked_add(4)
        .and_then(|end| bytes.get(at..end))
        .ok_or_else(|| PixgraphError::unresolved("icc profile read out of range"))?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

#[cfg(test)]
#[path = "../../tests/unit/color/icc.rs"]
mod tests;
