//! Widget tree, identifier allocation and callback routing
//!
//! Widgets are plain records with a closed variant tag; behavior differences
//! between windows, frames and buttons live in the tag match, not in a
//! subclass chain. The identifier allocator is explicit state owned by the
//! running mode and injected into every constructor.

use super::callback::TkCallback;
use super::shell::TkShell;

/// Allocates dotted widget identifiers: `.N` for top-level widgets,
/// `<parent>.N` for children. The counter is process-wide, strictly
/// increasing and never reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn take(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn root(&mut self) -> String {
        format!(".{}", self.take())
    }

    pub fn child(&mut self, parent: &str) -> String {
        format!("{parent}.{}", self.take())
    }
}

/// Closed set of widget variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Window,
    Frame,
    Button,
}

/// Reaction emitted when a routed callback reaches the widget owning it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Destroyed { id: String },
    Clicked { id: String },
}

#[derive(Debug)]
pub struct Widget {
    id: String,
    kind: WidgetKind,
    children: Vec<Widget>,
}

impl Widget {
    /// Create a top-level window; its destroy notification is bound so the
    /// owner learns when the user closes it.
    pub fn window(shell: &mut TkShell, ids: &mut IdAllocator) -> Widget {
        let widget = Widget {
            id: ids.root(),
            kind: WidgetKind::Window,
            children: Vec::new(),
        };
        shell.execute(&format!("toplevel {}", widget.id));
        widget.bind_event(shell, "Destroy", "OnDestroy", &[]);
        shell.execute("update");
        widget
    }

    pub fn frame(shell: &mut TkShell, ids: &mut IdAllocator, parent: &str) -> Widget {
        let widget = Widget {
            id: ids.child(parent),
            kind: WidgetKind::Frame,
            children: Vec::new(),
        };
        shell.execute(&format!("frame {}", widget.id));
        widget
    }

    /// Create a button whose press reports back over the bridge.
    pub fn button(shell: &mut TkShell, ids: &mut IdAllocator, parent: &str, label: &str) -> Widget {
        let widget = Widget {
            id: ids.child(parent),
            kind: WidgetKind::Button,
            children: Vec::new(),
        };
        let event = TkCallback::encode(&widget.id, "OnClick", &[]);
        shell.execute(&format!(
            "button {} -command {{puts \"{event}\"}} -text \"{label}\"",
            widget.id
        ));
        widget
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn attach(&mut self, child: Widget) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, id: &str) -> Option<Widget> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    pub fn children(&self) -> &[Widget] {
        &self.children
    }

    /// Register a toolkit-level event that reports back as a callback line.
    pub fn bind_event(
        &self,
        shell: &mut TkShell,
        trigger: &str,
        name: &str,
        params: &[(&str, &str)],
    ) {
        let event = TkCallback::encode(&self.id, name, params);
        shell.execute(&format!("bind {} <{trigger}> {{puts \"{event}\"}}", self.id));
    }

    pub fn configure(&self, shell: &mut TkShell, property: &str, value: &str) {
        shell.execute(&format!("{} configure -{property} {value}", self.id));
    }

    pub fn set_background(&self, shell: &mut TkShell, color: &str) {
        self.configure(shell, "background", color);
    }

    pub fn pack(&self, shell: &mut TkShell, options: &[(&str, &str)]) {
        let mut command = format!("pack {}", self.id);
        for (option, value) in options {
            command.push_str(&format!(" -{option} {value}"));
        }
        shell.execute(&command);
    }

    pub fn destroy(&self, shell: &mut TkShell) {
        shell.execute(&format!("destroy {}", self.id));
    }

    /// Route a decoded callback. An exact identifier match dispatches on the
    /// variant's recognized event names (anything else is accepted and
    /// ignored); otherwise the callback is forwarded to the child subtree
    /// owning the identifier.
    pub fn handle_callback(&self, callback: &TkCallback, out: &mut Vec<WidgetEvent>) {
        if callback.widget_id == self.id {
            match (self.kind, callback.name.as_str()) {
                (WidgetKind::Window, "OnDestroy") => out.push(WidgetEvent::Destroyed {
                    id: self.id.clone(),
                }),
                (WidgetKind::Button, "OnClick") => out.push(WidgetEvent::Clicked {
                    id: self.id.clone(),
                }),
                _ => {}
            }
        } else {
            for child in &self.children {
                if is_path_prefix(&child.id, &callback.widget_id) {
                    child.handle_callback(callback, out);
                }
            }
        }
    }
}

/// True when `id` equals `prefix` or sits below it on a dot boundary, so
/// `.1` owns `.1.4` but never `.10`.
fn is_path_prefix(prefix: &str, id: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_shell() -> TkShell {
        TkShell::spawn("cat", &[]).unwrap()
    }

    fn callback(widget_id: &str, name: &str) -> TkCallback {
        TkCallback {
            widget_id: widget_id.to_string(),
            name: name.to_string(),
            params: std::collections::HashMap::new(),
        }
    }

    #[test]
    fn test_id_allocation_is_strictly_increasing() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let first = Widget::window(&mut shell, &mut ids);
        let second = Widget::window(&mut shell, &mut ids);
        let child = Widget::button(&mut shell, &mut ids, second.id(), "Ok");

        assert_eq!(first.id(), ".0");
        assert_eq!(second.id(), ".1");
        assert_eq!(child.id(), ".1.2");
    }

    #[test]
    fn test_routing_reaches_the_owning_widget() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let mut window = Widget::window(&mut shell, &mut ids);
        let button = Widget::button(&mut shell, &mut ids, window.id(), "Ok");
        let button_id = button.id().to_string();
        window.attach(button);

        let mut events = Vec::new();
        window.handle_callback(&callback(&button_id, "OnClick"), &mut events);
        assert_eq!(events, vec![WidgetEvent::Clicked { id: button_id }]);

        let mut events = Vec::new();
        window.handle_callback(&callback(window.id(), "OnDestroy"), &mut events);
        assert_eq!(
            events,
            vec![WidgetEvent::Destroyed {
                id: window.id().to_string()
            }]
        );
    }

    #[test]
    fn test_routing_descends_through_intermediate_frames() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let mut window = Widget::window(&mut shell, &mut ids);
        let mut frame = Widget::frame(&mut shell, &mut ids, window.id());
        let button = Widget::button(&mut shell, &mut ids, frame.id(), "Ok");
        let button_id = button.id().to_string();
        assert_eq!(frame.kind(), WidgetKind::Frame);

        frame.attach(button);
        window.attach(frame);

        let mut events = Vec::new();
        window.handle_callback(&callback(&button_id, "OnClick"), &mut events);
        assert_eq!(events, vec![WidgetEvent::Clicked { id: button_id }]);
        // The frame itself recognizes no events.
        let frame_id = window.children()[0].id().to_string();
        let mut events = Vec::new();
        window.handle_callback(&callback(&frame_id, "OnClick"), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_unknown_event_names_are_silently_accepted() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let window = Widget::window(&mut shell, &mut ids);
        let mut events = Vec::new();
        window.handle_callback(&callback(window.id(), "OnResize"), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_routing_never_crosses_sibling_prefixes() {
        // `.1` must not capture callbacks addressed to `.10`.
        assert!(is_path_prefix(".1", ".1"));
        assert!(is_path_prefix(".1", ".1.4"));
        assert!(!is_path_prefix(".1", ".10"));
        assert!(!is_path_prefix(".1", ".2.1"));
    }

    #[test]
    fn test_callbacks_for_unrelated_widgets_dispatch_nowhere() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let mut window = Widget::window(&mut shell, &mut ids);
        let button = Widget::button(&mut shell, &mut ids, window.id(), "Ok");
        window.attach(button);

        let mut events = Vec::new();
        window.handle_callback(&callback(".99", "OnClick"), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_remove_child() {
        let mut shell = test_shell();
        let mut ids = IdAllocator::default();

        let mut window = Widget::window(&mut shell, &mut ids);
        let button = Widget::button(&mut shell, &mut ids, window.id(), "Ok");
        let button_id = button.id().to_string();
        window.attach(button);

        assert!(window.remove_child(&button_id).is_some());
        assert!(window.remove_child(&button_id).is_none());
        assert!(window.children().is_empty());
    }
}
