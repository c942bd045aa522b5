use web_sys::{Element, HtmlElement};

use doodlepad_shared::{ClearPrompt, OptionGroup};

use crate::dom::set_class;

/// Marks the group's active option and clears the marker on its siblings.
pub fn sync_options<T>(elements: &[HtmlElement], group: &OptionGroup<T>) {
    for (index, element) in elements.iter().enumerate() {
        set_class(element, "active", group.is_active(index));
    }
}

pub fn sync_prompt(modal: &Element, prompt: ClearPrompt) {
    set_class(modal, "show", prompt == ClearPrompt::Shown);
}
