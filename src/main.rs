//! Hero Scene entry point
//!
//! On the web: mounts the scene into `#hero`, wires input and runs the frame
//! loop until the page is hidden. Natively: runs a headless scripted session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_hero {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, PageTransitionEvent, TouchEvent};

    use hero_scene::platform::{self, Attached};
    use hero_scene::renderer::{Viewport, WireframeRenderer};
    use hero_scene::scene::{Bounds, InputState, Scene};
    use hero_scene::settings::SceneSettings;

    /// Container element the canvas is appended to
    const CONTAINER_ID: &str = "hero";

    /// Canvas styling: full-viewport background layer that never eats clicks
    const CANVAS_STYLE: &str = "position:fixed;top:0;left:0;width:100%;height:100%;\
        z-index:-10;pointer-events:none;background:transparent";

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    thread_local! {
        static MOUNTED: RefCell<Option<MountedHero>> = const { RefCell::new(None) };
    }

    /// Scene plus the input its event handlers write
    struct Hero {
        scene: Scene<WireframeRenderer>,
        input: InputState,
    }

    /// DOM event subscription, removed again on drop
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Result<Self, JsValue> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                kind,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    /// requestAnimationFrame loop; dropping it cancels the pending frame
    struct FrameLoop {
        pending: Rc<Cell<Option<i32>>>,
        callback: FrameCallback,
    }

    impl FrameLoop {
        fn start(hero: Rc<RefCell<Hero>>) -> Self {
            let pending = Rc::new(Cell::new(None));
            let callback: FrameCallback = Rc::new(RefCell::new(None));

            let next = callback.clone();
            let next_pending = pending.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                {
                    let mut guard = hero.borrow_mut();
                    let hero = &mut *guard;
                    hero.scene.frame(&hero.input);
                }
                next_pending.set(request_frame(&next));
            }));

            pending.set(request_frame(&callback));
            Self { pending, callback }
        }
    }

    impl Drop for FrameLoop {
        fn drop(&mut self) {
            if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            // Breaks the closure -> callback reference cycle
            self.callback.borrow_mut().take();
        }
    }

    fn request_frame(callback: &FrameCallback) -> Option<i32> {
        let window = web_sys::window()?;
        let slot = callback.borrow();
        let closure = slot.as_ref()?;
        window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()
    }

    type AttachedCanvas = Attached<HtmlCanvasElement, fn(&HtmlCanvasElement)>;

    fn detach_canvas(canvas: &HtmlCanvasElement) {
        canvas.remove();
    }

    /// A running hero scene. Dropping it unsubscribes, cancels, disposes and detaches.
    pub struct MountedHero {
        listeners: Vec<Listener>,
        frames: Option<FrameLoop>,
        hero: Option<Rc<RefCell<Hero>>>,
        // Dropped after the body below, once the scene is gone
        _canvas: AttachedCanvas,
    }

    impl Drop for MountedHero {
        fn drop(&mut self) {
            self.listeners.clear();
            self.frames.take();
            // Last strong reference: the scene drops here and disposes its objects
            self.hero.take();
            log::info!("Hero scene unmounted");
        }
    }

    fn canvas_bounds(canvas: &HtmlCanvasElement) -> Bounds {
        let rect = canvas.get_bounding_client_rect();
        Bounds::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn js_err(context: &str, e: impl std::fmt::Debug) -> JsValue {
        JsValue::from_str(&format!("{context}: {e:?}"))
    }

    pub async fn mount(container_id: &str) -> Result<MountedHero, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no #{container_id} element")))?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_attribute("style", CANVAS_STYLE)?;
        container.append_child(&canvas)?;
        // Any early return from here on detaches the canvas again
        let attached: AttachedCanvas = Attached::new(canvas.clone(), detach_canvas);

        let settings = SceneSettings::load();
        let pixel_ratio = platform::pixel_ratio(settings.max_pixel_ratio);
        let viewport = platform::window_viewport().unwrap_or(Viewport::new(
            canvas.client_width() as f32,
            canvas.client_height() as f32,
        ));
        canvas.set_width((viewport.width * pixel_ratio) as u32);
        canvas.set_height((viewport.height * pixel_ratio) as u32);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| js_err("create surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| js_err("request adapter", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = WireframeRenderer::new(surface, &adapter, viewport, pixel_ratio)
            .await
            .map_err(|e| js_err("request device", e))?;

        let seed = platform::now_ms() as u64;
        let scene = Scene::mount(renderer, settings, seed);
        let hero = Rc::new(RefCell::new(Hero {
            scene,
            input: InputState::default(),
        }));

        let window_target: &EventTarget = window.as_ref();
        let mut listeners = Vec::with_capacity(4);

        {
            let hero = hero.clone();
            let canvas = canvas.clone();
            listeners.push(Listener::new(window_target, "resize", move |_event| {
                if let Some(viewport) = platform::window_viewport() {
                    canvas.set_width((viewport.width * pixel_ratio) as u32);
                    canvas.set_height((viewport.height * pixel_ratio) as u32);
                }
                hero.borrow_mut().scene.resize();
            })?);
        }

        {
            let hero = hero.clone();
            listeners.push(Listener::new(window_target, "scroll", move |_event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
                let document_height = window
                    .document()
                    .and_then(|d| d.document_element())
                    .map(|el| el.scroll_height() as f32)
                    .unwrap_or(0.0);
                let viewport_height = window
                    .inner_height()
                    .ok()
                    .and_then(|h| h.as_f64())
                    .unwrap_or(0.0) as f32;
                hero.borrow_mut()
                    .input
                    .on_scroll(scroll_y, document_height, viewport_height);
            })?);
        }

        // The canvas ignores pointer events, so track movement on the window
        // and normalize against the canvas rectangle.
        {
            let hero = hero.clone();
            let canvas = canvas.clone();
            listeners.push(Listener::new(window_target, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    hero.borrow_mut()
                        .input
                        .on_pointer_move(client, canvas_bounds(&canvas));
                }
            })?);
        }

        {
            let hero = hero.clone();
            let canvas = canvas.clone();
            listeners.push(Listener::new(window_target, "touchmove", move |event| {
                if let Some(event) = event.dyn_ref::<TouchEvent>() {
                    let list = event.touches();
                    let touches: Vec<Vec2> = (0..list.length())
                        .filter_map(|i| list.get(i))
                        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
                        .collect();
                    hero.borrow_mut()
                        .input
                        .on_touch_move(&touches, canvas_bounds(&canvas));
                }
            })?);
        }

        let frames = FrameLoop::start(hero.clone());

        Ok(MountedHero {
            listeners,
            frames: Some(frames),
            hero: Some(hero),
            _canvas: attached,
        })
    }

    /// Drop the mounted scene, if any
    fn unmount() {
        let mounted = MOUNTED.with(|slot| slot.borrow_mut().take());
        drop(mounted);
    }

    fn is_mounted() -> bool {
        MOUNTED.with(|slot| slot.borrow().is_some())
    }

    /// Mount again after the page comes back from the back/forward cache
    fn remount() {
        if is_mounted() {
            return;
        }
        wasm_bindgen_futures::spawn_local(async {
            match mount(CONTAINER_ID).await {
                Ok(mounted) if !is_mounted() => {
                    MOUNTED.with(|slot| *slot.borrow_mut() = Some(mounted));
                    log::info!("Hero scene remounted");
                }
                Ok(_) => {}
                Err(e) => log::error!("Hero scene remount failed: {:?}", e),
            }
        });
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| js_err("init logger", e))?;

        log::info!("Hero scene starting...");

        let mounted = mount(CONTAINER_ID).await?;
        MOUNTED.with(|slot| *slot.borrow_mut() = Some(mounted));

        // Tear down when the page goes away
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let on_hide = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| unmount());
        window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())?;
        on_hide.forget();

        // Restored from the back/forward cache: the scene was torn down on pagehide
        let on_show = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if persisted {
                remount();
            }
        });
        window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref())?;
        on_show.forget();

        log::info!("Hero scene running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_hero::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hero scene (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the web version");

    run_headless();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless session: pointer orbits the screen while the page scrolls
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() {
    use glam::Vec2;
    use hero_scene::renderer::{HeadlessRenderer, Viewport};
    use hero_scene::scene::{Bounds, InputState, Scene};
    use hero_scene::settings::SceneSettings;

    const FRAMES: u32 = 600;
    let viewport = Viewport::new(1920.0, 1080.0);
    let bounds = Bounds::new(0.0, 0.0, viewport.width, viewport.height);
    let document_height = viewport.height * 3.0;

    let mut renderer = HeadlessRenderer::new(viewport);
    let settings = SceneSettings::load();
    let seed = hero_scene::platform::now_ms() as u64;

    {
        let mut scene = Scene::mount(&mut renderer, settings, seed);
        let mut input = InputState::default();

        for frame in 0..FRAMES {
            let angle = frame as f32 / FRAMES as f32 * std::f32::consts::TAU;
            let client = bounds.center() + Vec2::new(angle.cos(), angle.sin()) * 400.0;
            input.on_pointer_move(client, bounds);
            let scroll_y = frame as f32 / FRAMES as f32 * (document_height - viewport.height);
            input.on_scroll(scroll_y, document_height, viewport.height);

            let time = scene.frame(&input);

            if frame % 120 == 0 {
                for obj in scene.objects() {
                    let t = &obj.transform;
                    log::info!(
                        "t={:.3} {:>11} #{} pos=({:+.2}, {:+.2}) scale={:.3}",
                        time,
                        obj.kind().as_str(),
                        obj.index(),
                        t.position.x,
                        t.position.y,
                        t.scale
                    );
                }
            }
        }
    }

    println!(
        "Rendered {} frames, disposed {} objects, {} still live",
        renderer.frames,
        renderer.disposed,
        renderer.live_objects()
    );
}
