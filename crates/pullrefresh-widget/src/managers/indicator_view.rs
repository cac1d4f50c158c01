use pullrefresh_ui_graphics::{GraphicsLayer, Rect, Size};
use pullrefresh_ui_layout::{Constraints, LayoutDimension, View};

/// Fixed-content view used by the built-in managers for their indicator.
///
/// Rendering belongs to the host; this view carries what a renderer needs
/// (size, placement, visibility and layer transform) and nothing else.
#[derive(Clone, Debug)]
pub struct IndicatorView {
    content_size: Size,
    layout_height: LayoutDimension,
    measured: Size,
    bounds: Rect,
    visible: bool,
    layer: GraphicsLayer,
}

impl IndicatorView {
    pub fn new(content_size: Size) -> Self {
        Self {
            content_size,
            layout_height: LayoutDimension::WrapContent,
            measured: Size::ZERO,
            bounds: Rect::default(),
            visible: true,
            layer: GraphicsLayer::default(),
        }
    }

    pub fn with_layout_height(mut self, height: LayoutDimension) -> Self {
        self.layout_height = height;
        self
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn layer(&self) -> GraphicsLayer {
        self.layer
    }

    pub fn layer_mut(&mut self) -> &mut GraphicsLayer {
        &mut self.layer
    }
}

impl View for IndicatorView {
    fn measure(&mut self, constraints: Constraints) -> Size {
        self.measured = constraints.constrain_size(self.content_size);
        self.measured
    }

    fn measured_size(&self) -> Size {
        self.measured
    }

    fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn layout_height(&self) -> LayoutDimension {
        self.layout_height
    }
}
