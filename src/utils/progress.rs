use indicatif::{ProgressBar, ProgressStyle};

/// Template for the record-counting spinner shown while a file streams.
pub const RECORDS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {msg} Records read: {pos} ({per_sec})";

/// Creates and configures a new `ProgressBar` or `ProgressBar::new_spinner()`
/// for displaying progress during long-running operations.
///
/// # Arguments
///
/// * `total_items` - The total number of items to process. If 0, a spinner is used,
///   suitable for when the total count is unknown.
/// * `message` - A message to display alongside the progress bar.
/// * `template` - A string defining the style and content of the progress bar.
///   See the `indicatif` crate documentation for template syntax.
///
/// The bar draws to stderr and stays invisible when stderr is not a terminal.
pub fn create_progress_bar(total_items: u64, message: &str, template: &str) -> ProgressBar {
    let pb = if total_items == 0 {
        // Spinner if total is unknown (or 0)
        ProgressBar::new_spinner()
    } else {
        ProgressBar::new(total_items)
    };
    pb.set_message(message.to_string());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar()) // Fallback style
            .progress_chars("=> "),
    );
    pb
}
