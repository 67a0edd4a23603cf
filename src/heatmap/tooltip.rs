//! The page's single floating tooltip.
//!
//! Every mounted heatmap holds a [`TooltipLease`]. The first lease mounts the
//! element, the last one to be dropped removes it again, so unmounting any
//! number of heatmaps leaves nothing behind in the document.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;

use crate::api::SeasonalDataPoint;

/// Pointer offset of the tooltip's top-left corner.
pub const OFFSET_X: f64 = 15.0;
pub const OFFSET_Y: f64 = -10.0;

/// The floating element the layer drives.
pub trait TooltipSurface {
    fn mount(&mut self);
    fn unmount(&mut self);
    fn set_visible(&mut self, visible: bool);
    fn place(&mut self, left: f64, top: f64);
    fn set_value(&mut self, value: f64);
}

struct LayerState<S> {
    surface: S,
    leases: usize,
    next_lease: u64,
    /// Lease whose cell is currently hovered.
    owner: Option<u64>,
}

/// Shared owner of the tooltip surface. Cloning yields another handle.
pub struct TooltipLayer<S> {
    state: Rc<RefCell<LayerState<S>>>,
}

impl<S> Clone for TooltipLayer<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: TooltipSurface> TooltipLayer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            state: Rc::new(RefCell::new(LayerState {
                surface,
                leases: 0,
                next_lease: 0,
                owner: None,
            })),
        }
    }

    /// Claim the tooltip for one heatmap, mounting it if this is the first.
    pub fn attach(&self) -> TooltipLease<S> {
        let mut state = self.state.borrow_mut();
        if state.leases == 0 {
            debug!("Mounting heatmap tooltip");
            state.surface.mount();
        }
        state.leases += 1;
        let id = state.next_lease;
        state.next_lease += 1;

        TooltipLease {
            id,
            state: Rc::clone(&self.state),
            highlighted: None,
        }
    }

    /// Number of live leases.
    pub fn leases(&self) -> usize {
        self.state.borrow().leases
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow().surface)
    }
}

/// One heatmap's handle on the tooltip. Dropping it is the detach.
pub struct TooltipLease<S: TooltipSurface> {
    id: u64,
    state: Rc<RefCell<LayerState<S>>>,
    highlighted: Option<String>,
}

impl<S: TooltipSurface> TooltipLease<S> {
    pub fn hover_enter(&mut self, cell_key: &str) {
        let mut state = self.state.borrow_mut();
        state.owner = Some(self.id);
        state.surface.set_visible(true);
        self.highlighted = Some(cell_key.to_string());
    }

    pub fn hover_move(&mut self, point: &SeasonalDataPoint, page_x: f64, page_y: f64) {
        let mut state = self.state.borrow_mut();
        state.owner = Some(self.id);
        state.surface.place(page_x + OFFSET_X, page_y + OFFSET_Y);
        state.surface.set_value(point.value);
    }

    pub fn hover_leave(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.owner == Some(self.id) {
            state.surface.set_visible(false);
            state.owner = None;
        }
        self.highlighted = None;
    }

    /// Key of the highlighted cell, if the pointer is over one.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn detach(self) {}
}

impl<S: TooltipSurface> Drop for TooltipLease<S> {
    fn drop(&mut self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            warn!("Tooltip layer busy while releasing lease {}", self.id);
            return;
        };
        if state.owner == Some(self.id) {
            state.surface.set_visible(false);
            state.owner = None;
        }
        state.leases = state.leases.saturating_sub(1);
        if state.leases == 0 {
            debug!("Removing heatmap tooltip");
            state.surface.unmount();
        }
    }
}

// -- Browser surface --

/// `div.heatmap-tooltip` appended to `document.body`.
#[derive(Default)]
pub struct DomTooltip {
    element: Option<web_sys::HtmlElement>,
}

impl DomTooltip {
    fn style(&self, property: &str, value: &str) {
        if let Some(el) = &self.element {
            let _ = el.style().set_property(property, value);
        }
    }
}

impl TooltipSurface for DomTooltip {
    fn mount(&mut self) {
        if self.element.is_some() {
            return;
        }
        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            warn!("No document available for tooltip");
            return;
        };
        let Some(body) = doc.body() else {
            return;
        };
        let Ok(el) = doc.create_element("div") else {
            warn!("Failed to create tooltip element");
            return;
        };
        let el: web_sys::HtmlElement = el.unchecked_into();
        el.set_class_name("heatmap-tooltip");
        let _ = body.append_child(&el);
        self.element = Some(el);
        self.style("position", "absolute");
        self.style("pointer-events", "none");
        self.style("opacity", "0");
    }

    fn unmount(&mut self) {
        if let Some(el) = self.element.take() {
            el.remove();
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.style("opacity", if visible { "1" } else { "0" });
    }

    fn place(&mut self, left: f64, top: f64) {
        self.style("left", &format!("{}px", left));
        self.style("top", &format!("{}px", top));
    }

    fn set_value(&mut self, value: f64) {
        if let Some(el) = &self.element {
            el.set_inner_html(&format!("Value: <strong>{}</strong>", value));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records what a real document would contain.
    #[derive(Debug, Default)]
    pub(crate) struct FakeDocument {
        pub mounted: usize,
        pub visible: bool,
        pub position: Option<(f64, f64)>,
        pub value: Option<f64>,
    }

    #[derive(Clone, Default)]
    pub(crate) struct FakeSurface(pub Rc<RefCell<FakeDocument>>);

    impl TooltipSurface for FakeSurface {
        fn mount(&mut self) {
            self.0.borrow_mut().mounted += 1;
        }
        fn unmount(&mut self) {
            let mut doc = self.0.borrow_mut();
            doc.mounted -= 1;
            doc.visible = false;
        }
        fn set_visible(&mut self, visible: bool) {
            self.0.borrow_mut().visible = visible;
        }
        fn place(&mut self, left: f64, top: f64) {
            self.0.borrow_mut().position = Some((left, top));
        }
        fn set_value(&mut self, value: f64) {
            self.0.borrow_mut().value = Some(value);
        }
    }

    #[test]
    fn test_hover_cycle() {
        let surface = FakeSurface::default();
        let layer = TooltipLayer::new(surface.clone());
        let mut lease = layer.attach();
        let point = SeasonalDataPoint::new("Monday", "11-1", 8.0);

        lease.hover_enter("Monday:11-1");
        assert!(surface.0.borrow().visible);
        assert_eq!(lease.highlighted(), Some("Monday:11-1"));

        lease.hover_move(&point, 100.0, 200.0);
        assert_eq!(surface.0.borrow().position, Some((115.0, 190.0)));
        assert_eq!(surface.0.borrow().value, Some(8.0));

        lease.hover_leave();
        assert!(!surface.0.borrow().visible);
        assert_eq!(lease.highlighted(), None);
    }

    #[test]
    fn test_single_element_shared_by_many_heatmaps() {
        let surface = FakeSurface::default();
        let layer = TooltipLayer::new(surface.clone());

        let leases: Vec<_> = (0..4).map(|_| layer.attach()).collect();
        assert_eq!(surface.0.borrow().mounted, 1);
        assert_eq!(layer.leases(), 4);

        drop(leases);
        assert_eq!(surface.0.borrow().mounted, 0);
        assert_eq!(layer.leases(), 0);
    }

    #[test]
    fn test_remount_after_full_release() {
        let surface = FakeSurface::default();
        let layer = TooltipLayer::new(surface.clone());

        layer.attach().detach();
        assert_eq!(surface.0.borrow().mounted, 0);

        let lease = layer.attach();
        assert_eq!(surface.0.borrow().mounted, 1);
        drop(lease);
        assert_eq!(surface.0.borrow().mounted, 0);
    }

    #[test]
    fn test_stale_leave_does_not_hide_other_heatmap() {
        let surface = FakeSurface::default();
        let layer = TooltipLayer::new(surface.clone());
        let mut winter = layer.attach();
        let mut spring = layer.attach();

        winter.hover_enter("Monday:11-1");
        spring.hover_enter("Friday:5-7");
        winter.hover_leave();
        assert!(surface.0.borrow().visible);

        spring.hover_leave();
        assert!(!surface.0.borrow().visible);
    }

    #[test]
    fn test_detach_while_hovered_hides() {
        let surface = FakeSurface::default();
        let layer = TooltipLayer::new(surface.clone());
        let _other = layer.attach();
        let mut hovered = layer.attach();

        hovered.hover_enter("Monday:11-1");
        hovered.detach();

        assert!(!surface.0.borrow().visible);
        assert_eq!(surface.0.borrow().mounted, 1);
    }
}
