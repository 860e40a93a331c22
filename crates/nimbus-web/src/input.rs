use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Accumulated input state read each frame by the application.
///
/// DOM listeners append here; the frame loop drains it once per frame, feeding
/// `events` to egui and the drag/wheel deltas to the orbit camera.
pub struct InputState {
    pub events: Vec<egui::Event>,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Wheel notches, positive toward the target.
    pub zoom_notches: f32,
    pub left_button_down: bool,
    pub middle_button_down: bool,
    pub right_button_down: bool,
    pub modifiers: egui::Modifiers,
    /// Set by the window resize listener, cleared once the surface is reconfigured.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            zoom_notches: 0.0,
            left_button_down: false,
            middle_button_down: false,
            right_button_down: false,
            modifiers: egui::Modifiers::NONE,
            resized: false,
        }
    }

    /// Clear per-frame deltas (called after camera update consumes them).
    pub fn clear_deltas(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.zoom_notches = 0.0;
    }

    pub fn take_events(&mut self) -> Vec<egui::Event> {
        std::mem::take(&mut self.events)
    }

    fn set_button(&mut self, button: i16, down: bool) {
        match button {
            0 => self.left_button_down = down,
            1 => self.middle_button_down = down,
            2 => self.right_button_down = down,
            _ => {}
        }
    }

    fn release_all(&mut self) {
        self.left_button_down = false;
        self.middle_button_down = false;
        self.right_button_down = false;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

fn pointer_pos(e: &web_sys::MouseEvent) -> egui::Pos2 {
    egui::pos2(e.offset_x() as f32, e.offset_y() as f32)
}

fn modifiers(e: &web_sys::MouseEvent) -> egui::Modifiers {
    egui::Modifiers {
        alt: e.alt_key(),
        ctrl: e.ctrl_key(),
        shift: e.shift_key(),
        mac_cmd: e.meta_key(),
        command: e.ctrl_key() || e.meta_key(),
    }
}

fn egui_button(button: i16) -> Option<egui::PointerButton> {
    match button {
        0 => Some(egui::PointerButton::Primary),
        1 => Some(egui::PointerButton::Middle),
        2 => Some(egui::PointerButton::Secondary),
        _ => None,
    }
}

/// Wheel delta in notches, positive when scrolling up.
fn wheel_notches(delta_y: f64, delta_mode: u32) -> f32 {
    let delta = -delta_y as f32;
    match delta_mode {
        1 => delta / 3.0,   // lines
        2 => delta * 10.0,  // pages
        _ => delta / 100.0, // pixels
    }
}

fn add_mouse_listener(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::MouseEvent) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Register pointer and wheel listeners on the canvas and a resize listener on
/// the window ONCE at init. Closures are leaked via `.forget()` since they live
/// for the app lifetime.
pub fn register_input_listeners(
    window: &web_sys::Window,
    canvas: &web_sys::HtmlCanvasElement,
    state: Rc<RefCell<InputState>>,
) -> Result<(), JsValue> {
    let target: &web_sys::EventTarget = canvas.as_ref();

    {
        let state = state.clone();
        add_mouse_listener(target, "mousemove", move |e: web_sys::MouseEvent| {
            let mut s = state.borrow_mut();
            s.mouse_dx += e.movement_x() as f32;
            s.mouse_dy += e.movement_y() as f32;
            s.modifiers = modifiers(&e);
            s.events.push(egui::Event::PointerMoved(pointer_pos(&e)));
        })?;
    }

    for (name, pressed) in [("mousedown", true), ("mouseup", false)] {
        let state = state.clone();
        add_mouse_listener(target, name, move |e: web_sys::MouseEvent| {
            let mut s = state.borrow_mut();
            s.set_button(e.button(), pressed);
            s.modifiers = modifiers(&e);
            if let Some(button) = egui_button(e.button()) {
                let modifiers = s.modifiers;
                s.events.push(egui::Event::PointerButton {
                    pos: pointer_pos(&e),
                    button,
                    pressed,
                    modifiers,
                });
            }
        })?;
    }

    {
        let state = state.clone();
        add_mouse_listener(target, "mouseleave", move |_: web_sys::MouseEvent| {
            let mut s = state.borrow_mut();
            s.release_all();
            s.events.push(egui::Event::PointerGone);
        })?;
    }

    // wheel: non-passive so preventDefault stops page scrolling
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::WheelEvent)>::new(move |e: web_sys::WheelEvent| {
                e.prevent_default();
                let mut s = state.borrow_mut();
                let notches = wheel_notches(e.delta_y(), e.delta_mode());
                s.zoom_notches += notches;
                let modifiers = s.modifiers;
                s.events.push(egui::Event::MouseWheel {
                    unit: egui::MouseWheelUnit::Line,
                    delta: egui::vec2(0.0, notches),
                    modifiers,
                });
            });
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
    }

    // right-drag pans, so keep the context menu away
    add_mouse_listener(target, "contextmenu", |e: web_sys::MouseEvent| {
        e.prevent_default();
    })?;

    {
        let closure = Closure::<dyn FnMut()>::new(move || {
            state.borrow_mut().resized = true;
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_normalization() {
        assert!((wheel_notches(-100.0, 0) - 1.0).abs() < 1e-6);
        assert!((wheel_notches(3.0, 1) + 1.0).abs() < 1e-6);
        assert!((wheel_notches(-1.0, 2) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_deltas_keeps_buttons() {
        let mut s = InputState::new();
        s.set_button(0, true);
        s.mouse_dx = 4.0;
        s.zoom_notches = 2.0;
        s.clear_deltas();
        assert_eq!(s.mouse_dx, 0.0);
        assert_eq!(s.zoom_notches, 0.0);
        assert!(s.left_button_down);
    }

    #[test]
    fn test_take_events_drains() {
        let mut s = InputState::new();
        s.events.push(egui::Event::PointerGone);
        assert_eq!(s.take_events().len(), 1);
        assert!(s.events.is_empty());
    }
}
