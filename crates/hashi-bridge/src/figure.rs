//! Figure capture: routes a plotting renderer's "show" entry point into
//! the display publisher instead of a native window.
//!
//! The plotting library is an external collaborator; the bridge sees it
//! through the `Renderable` seam. A renderer registers the current figure
//! here (the explicit extension point — no entry-point patching), and the
//! host's loop calls `show` where the library's interactive show would
//! run.

use hashi_types::{mime, BridgeResult, Diagnostic, RichValue};

use crate::context::BridgeContext;
use crate::publish::publish;

/// Anything that can render itself to SVG markup.
pub trait Renderable {
    /// Render to a complete SVG document.
    fn render_svg(&self, opts: &RenderOptions) -> BridgeResult<String>;
}

/// Rendering parameters for captured figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Crop to the drawn content rather than the canvas size.
    pub tight_bbox: bool,
    /// Canvas background color.
    pub background: String,
    /// Transparent background. Captured figures are opaque so they stay
    /// legible on dark host UIs.
    pub transparent: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tight_bbox: true,
            background: "white".to_string(),
            transparent: false,
        }
    }
}

/// Whether the caller asked for blocking show semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    /// Caller did not specify; delegate the library default.
    #[default]
    Auto,
    /// Caller explicitly requested a blocking show.
    Block,
    /// Caller explicitly requested a non-blocking show.
    NonBlock,
}

/// The original show behavior, invoked after capture so whatever blocking
/// contract the host's loop depends on is preserved. The argument is
/// "block?".
pub type ShowHook = Box<dyn FnMut(bool)>;

/// Holds the current figure and the original show behavior.
pub struct FigureRegistry {
    current: Option<Box<dyn Renderable>>,
    original_show: Option<ShowHook>,
    render_opts: RenderOptions,
}

impl Default for FigureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self {
            current: None,
            original_show: None,
            render_opts: RenderOptions::default(),
        }
    }

    /// Install the current figure; replaces any previous one.
    pub fn set_figure(&mut self, figure: Box<dyn Renderable>) {
        self.current = Some(figure);
    }

    /// True if a figure is open.
    pub fn has_figure(&self) -> bool {
        self.current.is_some()
    }

    /// Drop the current figure without showing it.
    pub fn clear_figure(&mut self) {
        self.current = None;
    }

    /// Install the original show behavior (headless no-op by default).
    pub fn on_original_show(&mut self, hook: impl FnMut(bool) + 'static) {
        self.original_show = Some(Box::new(hook));
    }

    /// Override the rendering parameters.
    pub fn set_render_options(&mut self, opts: RenderOptions) {
        self.render_opts = opts;
    }

    /// Capture the current figure and publish it as SVG.
    ///
    /// With no open figure this just delegates to the original show.
    /// Render failures become diagnostics; the enclosing evaluation is
    /// never aborted. After a successful capture the figure is cleared so
    /// the next plotting call starts from a blank canvas; a failed render
    /// leaves it open so the caller can retry.
    pub fn show(&mut self, ctx: &mut BridgeContext, mode: ShowMode) {
        let rendered = self
            .current
            .as_ref()
            .map(|figure| figure.render_svg(&self.render_opts));
        match rendered {
            Some(Ok(svg)) => {
                self.current = None;
                let data = RichValue::map(vec![(mime::IMAGE_SVG, RichValue::Str(svg))]);
                publish(ctx, &data, None, None, false);
            }
            Some(Err(err)) => {
                ctx.diag.emit(&Diagnostic::DisplayHookError {
                    detail: format!("Error capturing plot: {err}"),
                });
            }
            None => {}
        }
        self.call_original(mode);
    }

    fn call_original(&mut self, mode: ShowMode) {
        if let Some(hook) = self.original_show.as_mut() {
            hook(matches!(mode, ShowMode::Block));
        }
    }
}
