use bevy::prelude::*;
use bevy::render::renderer::RenderAdapterInfo;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No rendering context could be created at all (headless or blocked).
    #[error("renderer probe context unavailable")]
    ContextUnavailable,

    /// A context exists but the renderer string could not be read.
    #[error("renderer query failed: {0}")]
    QueryFailed(String),
}

/// A disposable context that can report the GPU renderer string.
pub trait RendererProbe {
    fn renderer_string(&mut self) -> Result<String, ProbeError>;

    /// Release whatever context the probe created.
    /// Returns false when the context could not be released.
    fn release(&mut self) -> bool;
}

/// Read the renderer string and release the probe immediately afterwards.
/// A probe that fails to release is logged as a defect; the reading still stands.
pub fn read_renderer<P: RendererProbe>(probe: &mut P) -> Result<String, ProbeError> {
    let renderer = probe.renderer_string();
    if !probe.release() {
        error!("Renderer probe context was not released");
    }
    match &renderer {
        Ok(name) => info!("Renderer probe: {}", name),
        Err(e) => warn!("Renderer probe: {}", e),
    }
    renderer
}

/// Probe with a fixed answer, used for configured or RPC overrides.
pub struct FixedRendererProbe {
    renderer: String,
}

impl FixedRendererProbe {
    pub fn new(renderer: impl Into<String>) -> Self {
        Self {
            renderer: renderer.into(),
        }
    }
}

impl RendererProbe for FixedRendererProbe {
    fn renderer_string(&mut self) -> Result<String, ProbeError> {
        Ok(self.renderer.clone())
    }

    fn release(&mut self) -> bool {
        true
    }
}

/// Native probe backed by the adapter Bevy already opened.
/// There is no throwaway context to release.
pub struct AdapterProbe<'a> {
    adapter: Option<&'a RenderAdapterInfo>,
}

impl<'a> AdapterProbe<'a> {
    pub fn new(adapter: Option<&'a RenderAdapterInfo>) -> Self {
        Self { adapter }
    }
}

impl RendererProbe for AdapterProbe<'_> {
    fn renderer_string(&mut self) -> Result<String, ProbeError> {
        let adapter = self.adapter.ok_or(ProbeError::ContextUnavailable)?;
        let name = adapter.name.trim();
        if name.is_empty() {
            return Err(ProbeError::QueryFailed("adapter reports no name".into()));
        }
        Ok(name.to_string())
    }

    fn release(&mut self) -> bool {
        self.adapter = None;
        true
    }
}

/// Web probe: a detached canvas with its own WebGL context, read through
/// `WEBGL_debug_renderer_info` and dropped through `WEBGL_lose_context`.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct WebGlProbe {
    context: Option<web_sys::WebGlRenderingContext>,
}

#[cfg(target_arch = "wasm32")]
impl WebGlProbe {
    fn create_context() -> Option<web_sys::WebGlRenderingContext> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .ok()?;
        canvas
            .get_context("webgl")
            .ok()
            .flatten()?
            .dyn_into::<web_sys::WebGlRenderingContext>()
            .ok()
    }
}

#[cfg(target_arch = "wasm32")]
impl RendererProbe for WebGlProbe {
    fn renderer_string(&mut self) -> Result<String, ProbeError> {
        if self.context.is_none() {
            self.context = Self::create_context();
        }
        let gl = self.context.as_ref().ok_or(ProbeError::ContextUnavailable)?;

        let parameter = match gl.get_extension("WEBGL_debug_renderer_info") {
            Ok(Some(_)) => web_sys::WebglDebugRendererInfo::UNMASKED_RENDERER_WEBGL,
            Ok(None) => web_sys::WebGlRenderingContext::RENDERER,
            Err(e) => return Err(ProbeError::QueryFailed(format!("{e:?}"))),
        };

        gl.get_parameter(parameter)
            .map_err(|e| ProbeError::QueryFailed(format!("{e:?}")))?
            .as_string()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ProbeError::QueryFailed("renderer parameter is not a string".into()))
    }

    fn release(&mut self) -> bool {
        use wasm_bindgen::JsCast;

        let Some(gl) = self.context.take() else {
            return true;
        };
        match gl.get_extension("WEBGL_lose_context") {
            Ok(Some(extension)) => {
                extension
                    .unchecked_into::<web_sys::WebglLoseContext>()
                    .lose_context();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LeakyProbe {
        released: bool,
    }

    impl RendererProbe for LeakyProbe {
        fn renderer_string(&mut self) -> Result<String, ProbeError> {
            Ok("Mali-G57".into())
        }

        fn release(&mut self) -> bool {
            self.released = true;
            false
        }
    }

    #[test]
    fn read_renderer_releases_even_when_release_fails() {
        let mut probe = LeakyProbe { released: false };
        let renderer = read_renderer(&mut probe);
        assert_eq!(renderer, Ok("Mali-G57".to_string()));
        assert!(probe.released);
    }

    #[test]
    fn adapter_probe_without_adapter_has_no_context() {
        let mut probe = AdapterProbe::new(None);
        assert_eq!(read_renderer(&mut probe), Err(ProbeError::ContextUnavailable));
    }

    #[test]
    fn fixed_probe_reports_its_renderer() {
        let mut probe = FixedRendererProbe::new("Apple GPU");
        assert_eq!(read_renderer(&mut probe), Ok("Apple GPU".to_string()));
    }
}
