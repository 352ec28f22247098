//! Collaborators that reach the live template files
//!
//! The version manager never touches the template tree itself. Reading the
//! unmanaged content and writing a version back go through these traits,
//! implemented by the local file service and by the HTTP bridge client.

/// Source of the live, unmanaged template content
pub trait OriginalSource {
    /// Current file content, or `None` when it cannot be fetched
    fn fetch_original(&self, template_path: &str) -> Option<String>;
}

/// Sink that writes content over the live template file
pub trait TemplateWriter {
    /// True when the write (and its backup) succeeded
    fn write_to_disk(&self, template_path: &str, content: &str) -> bool;
}

impl<T: OriginalSource + ?Sized> OriginalSource for Box<T> {
    fn fetch_original(&self, template_path: &str) -> Option<String> {
        (**self).fetch_original(template_path)
    }
}

impl<T: OriginalSource + ?Sized> OriginalSource for &T {
    fn fetch_original(&self, template_path: &str) -> Option<String> {
        (**self).fetch_original(template_path)
    }
}

impl<T: TemplateWriter + ?Sized> TemplateWriter for Box<T> {
    fn write_to_disk(&self, template_path: &str, content: &str) -> bool {
        (**self).write_to_disk(template_path, content)
    }
}

/// Original source with nothing behind it
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOriginals;

impl OriginalSource for NoOriginals {
    fn fetch_original(&self, _template_path: &str) -> Option<String> {
        None
    }
}
