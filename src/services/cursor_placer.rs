use crate::geometry::{Point, Rect};

/// Куда переместить курсор, если он ещё не над окном.
///
/// `None` when the cursor already lies inside `rect`, edges included.
pub fn place(rect: Rect, cursor: Point) -> Option<Point> {
    if rect.contains(cursor) {
        None
    } else {
        Some(rect.center())
    }
}
