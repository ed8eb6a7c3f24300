pub(crate) mod chat;
pub(crate) mod quiz;
pub(crate) mod upload;

#[cfg(test)]
mod flow_scripts;
#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chat::ChatView;
pub use quiz::QuizView;
pub use upload::UploadView;
