/// Drag/maximize state for the floating quiz panel.
///
/// Position is stored as offsets from the top-right viewport corner rather
/// than raw top/left, so the panel keeps its anchoring when the viewport is
/// resized. All coordinates are in logical pixels.
#[derive(Debug, Clone)]
pub struct FloatingPanel {
    from_right: f32,
    from_top: f32,
    maximized: bool,
    drag: Option<DragGrab>,
}

/// Pointer offset inside the panel's bounding box, captured at drag start.
#[derive(Debug, Clone, Copy)]
struct DragGrab {
    x: f32,
    y: f32,
}

impl Default for FloatingPanel {
    fn default() -> Self {
        Self {
            from_right: 24.0,
            from_top: 96.0,
            maximized: false,
            drag: None,
        }
    }
}

impl FloatingPanel {
    /// Resolves the anchors to a top-left point, clamped so the whole
    /// bounding box stays inside the viewport on both axes.
    pub fn position(&self, viewport: (f32, f32), size: (f32, f32)) -> (f32, f32) {
        if self.maximized {
            return (0.0, 0.0);
        }
        let (vw, vh) = viewport;
        let (w, h) = size;
        let x = vw - self.from_right - w;
        let y = self.from_top;
        (clamp_axis(x, vw, w), clamp_axis(y, vh, h))
    }

    /// Starts a drag with the pointer at `grab`, relative to the panel's
    /// bounding box. No-op while maximized.
    pub fn begin_drag(&mut self, grab: (f32, f32)) {
        if self.maximized {
            return;
        }
        self.drag = Some(DragGrab {
            x: grab.0,
            y: grab.1,
        });
    }

    /// Moves the panel so the grabbed point follows the cursor, then
    /// re-anchors against the right edge. No-op when no drag is active.
    pub fn drag_to(&mut self, cursor: (f32, f32), viewport: (f32, f32), size: (f32, f32)) {
        let Some(grab) = self.drag else {
            return;
        };
        let (vw, vh) = viewport;
        let (w, h) = size;
        let x = clamp_axis(cursor.0 - grab.x, vw, w);
        let y = clamp_axis(cursor.1 - grab.y, vh, h);
        self.from_right = vw - x - w;
        self.from_top = y;
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Flips maximize. Any active drag ends; dragging is disabled while
    /// maximized.
    pub fn toggle_maximized(&mut self) {
        self.maximized = !self.maximized;
        self.drag = None;
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }
}

fn clamp_axis(pos: f32, extent: f32, span: f32) -> f32 {
    pos.clamp(0.0, (extent - span).max(0.0))
}
