use crate::foundation::core::{NodeId, Rect};

/// Union of the bounding boxes of the connected inputs. `None` entries are unconnected pads.
pub(crate) fn bounding_box<I>(inputs: I) -> Rect
where
    I: IntoIterator<Item = Option<Rect>>,
{
    inputs
        .into_iter()
        .flatten()
        .fold(Rect::default(), Rect::union)
}

/// Pick the detect hit of a composer from its per-pad hits, in pad order.
///
/// Later pads are drawn over earlier ones, so the last hit wins.
pub(crate) fn prefer_topmost(hits: &[Option<NodeId>]) -> Option<NodeId> {
    hits.iter().rev().find_map(|h| *h)
}

#[cfg(test)]
#[path = "../../tests/unit/op/composer.rs"]
mod tests;
