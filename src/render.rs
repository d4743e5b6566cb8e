use crate::camera3d::Camera3D;
use crate::mesh::{self, ExportObject};
use crate::object::{ObjectKind, Transform};
use anyhow::{bail, Result};
use glam::{UVec2, Vec2};
use std::collections::BTreeMap;

/// Opaque handle to the renderable that backs one scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProxyHandle(pub u64);

/// Selection emphasis. Single and multi selection must read differently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Single,
    Multi,
}

/// Everything the editor needs from the rendering layer. Implementations own the proxies; the
/// editor only holds handles and guarantees every created proxy is destroyed exactly once.
pub trait RenderBackend {
    fn create_proxy(&mut self, kind: ObjectKind) -> ProxyHandle;
    fn destroy_proxy(&mut self, handle: ProxyHandle);
    fn set_proxy_transform(&mut self, handle: ProxyHandle, transform: &Transform);
    fn set_highlight(&mut self, handle: ProxyHandle, highlight: Highlight);
    /// Attaches the transform gizmo to a proxy, or detaches it with `None`.
    fn attach_gizmo(&mut self, handle: Option<ProxyHandle>);
    /// Topmost proxy under a viewport pixel.
    fn pick(&self, screen: Vec2) -> Option<ProxyHandle>;
    fn render_frame(&mut self) -> Result<()>;
    fn export_scene(&mut self, objects: &[ExportObject]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ProxyState {
    pub kind: ObjectKind,
    pub transform: Transform,
    pub highlight: Highlight,
}

const PICK_RADIUS_PX: f32 = 24.0;

/// Renderer that keeps proxies in memory and draws nothing. Picking projects each proxy origin
/// through the viewport camera and hits the nearest one within a small pixel radius.
#[derive(Debug)]
pub struct HeadlessRenderer {
    proxies: BTreeMap<ProxyHandle, ProxyState>,
    next_handle: u64,
    gizmo: Option<ProxyHandle>,
    camera: Camera3D,
    viewport: UVec2,
    frames_rendered: u64,
    fail_exports: bool,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(Camera3D::default(), UVec2::new(1280, 720))
    }
}

impl HeadlessRenderer {
    pub fn new(camera: Camera3D, viewport: UVec2) -> Self {
        Self {
            proxies: BTreeMap::new(),
            next_handle: 0,
            gizmo: None,
            camera,
            viewport,
            frames_rendered: 0,
            fail_exports: false,
        }
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn proxy(&self, handle: ProxyHandle) -> Option<&ProxyState> {
        self.proxies.get(&handle)
    }

    pub fn live_proxy_count(&self) -> usize {
        self.proxies.len()
    }

    pub fn gizmo_target(&self) -> Option<ProxyHandle> {
        self.gizmo
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Makes every subsequent export fail, for exercising error paths.
    pub fn set_fail_exports(&mut self, fail: bool) {
        self.fail_exports = fail;
    }

    /// Viewport pixel where a proxy's origin lands, if it is in front of the camera.
    pub fn screen_position(&self, handle: ProxyHandle) -> Option<Vec2> {
        let proxy = self.proxies.get(&handle)?;
        self.camera.project_point(proxy.transform.position, self.viewport).map(|(screen, _)| screen)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn create_proxy(&mut self, kind: ObjectKind) -> ProxyHandle {
        self.next_handle += 1;
        let handle = ProxyHandle(self.next_handle);
        self.proxies.insert(handle, ProxyState { kind, transform: Transform::default(), highlight: Highlight::None });
        handle
    }

    fn destroy_proxy(&mut self, handle: ProxyHandle) {
        if self.proxies.remove(&handle).is_none() {
            log::warn!(target: "render", "destroy requested for unknown proxy {:?}", handle);
        }
        if self.gizmo == Some(handle) {
            self.gizmo = None;
        }
    }

    fn set_proxy_transform(&mut self, handle: ProxyHandle, transform: &Transform) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.transform = *transform;
        }
    }

    fn set_highlight(&mut self, handle: ProxyHandle, highlight: Highlight) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.highlight = highlight;
        }
    }

    fn attach_gizmo(&mut self, handle: Option<ProxyHandle>) {
        self.gizmo = handle.filter(|h| self.proxies.contains_key(h));
    }

    fn pick(&self, screen: Vec2) -> Option<ProxyHandle> {
        self.proxies
            .iter()
            .filter_map(|(handle, proxy)| {
                let (projected, depth) = self.camera.project_point(proxy.transform.position, self.viewport)?;
                (projected.distance(screen) <= PICK_RADIUS_PX).then_some((*handle, depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    fn render_frame(&mut self) -> Result<()> {
        self.frames_rendered += 1;
        Ok(())
    }

    fn export_scene(&mut self, objects: &[ExportObject]) -> Result<Vec<u8>> {
        if self.fail_exports {
            bail!("Headless exporter configured to fail");
        }
        Ok(mesh::write_obj(objects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn pick_prefers_nearest_proxy() {
        let mut renderer = HeadlessRenderer::default();
        let far = renderer.create_proxy(ObjectKind::Cube);
        let near = renderer.create_proxy(ObjectKind::Cube);
        let camera_pos = renderer.camera().position;
        let dir = (renderer.camera().target - camera_pos).normalize();
        renderer.set_proxy_transform(far, &Transform::from_position(camera_pos + dir * 10.0));
        renderer.set_proxy_transform(near, &Transform::from_position(camera_pos + dir * 4.0));
        let screen = renderer.screen_position(near).expect("visible");
        assert_eq!(renderer.pick(screen), Some(near));
    }

    #[test]
    fn pick_misses_empty_space() {
        let mut renderer = HeadlessRenderer::default();
        let handle = renderer.create_proxy(ObjectKind::Quad);
        renderer.set_proxy_transform(handle, &Transform::from_position(Vec3::ZERO));
        assert_eq!(renderer.pick(Vec2::new(2.0, 2.0)), None);
    }

    #[test]
    fn destroying_gizmo_target_detaches_gizmo() {
        let mut renderer = HeadlessRenderer::default();
        let handle = renderer.create_proxy(ObjectKind::Cube);
        renderer.attach_gizmo(Some(handle));
        renderer.destroy_proxy(handle);
        assert_eq!(renderer.gizmo_target(), None);
        assert_eq!(renderer.live_proxy_count(), 0);
    }
}
