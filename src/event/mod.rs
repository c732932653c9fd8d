//! Event system: input types, key bindings, focus, text editing, state.

pub mod binding;
pub mod editing;
pub mod focus;
pub mod input;
pub mod state;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use editing::TextCursor;
pub use focus::FocusChain;
pub use input::{FrameInput, InputEvent, Key, KeyEvent, Modifiers, MouseButton, MouseSample};
pub use state::{Blink, InteractionMode, InteractionState, PendingActivation};
