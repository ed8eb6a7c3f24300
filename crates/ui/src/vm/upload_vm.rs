use imagier_core::model::{DataUrl, SessionPatch, is_image_media_type, media_type_for_file};
use services::Identification;

pub const ERR_DROP_NOT_IMAGE: &str = "Please drop an image file";
pub const ERR_NO_SELECTION: &str = "Please select an image first";
pub const ERR_IDENTIFY_FAILED: &str = "Error identifying the image. Please try again.";

/// A selected image, already encoded for transport. No resizing or
/// compression: raw bytes, base64 in a data URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDraft {
    pub file_name: String,
    pub media_type: &'static str,
    pub data_url: DataUrl,
}

impl ImageDraft {
    #[must_use]
    pub fn from_file(file_name: &str, bytes: &[u8]) -> Self {
        let media_type = media_type_for_file(file_name);
        Self {
            file_name: file_name.to_string(),
            media_type,
            data_url: DataUrl::encode(media_type, bytes),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Previewing(ImageDraft),
    Identifying(ImageDraft),
}

/// Upload/identify flow: `Idle -> Previewing -> Identifying`, then either
/// resolved (the view hands off to chat) or back to `Previewing` with the
/// selection preserved for a manual retry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadVm {
    state: UploadState,
    error: Option<&'static str>,
}

impl UploadVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    #[must_use]
    pub fn preview(&self) -> Option<&ImageDraft> {
        match &self.state {
            UploadState::Idle => None,
            UploadState::Previewing(draft) | UploadState::Identifying(draft) => Some(draft),
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    #[must_use]
    pub fn is_identifying(&self) -> bool {
        matches!(self.state, UploadState::Identifying(_))
    }

    /// Explicit picker selection. The picker's `accept` filter already
    /// narrowed to images, so anything chosen is taken as-is.
    pub fn pick(&mut self, file_name: &str, bytes: &[u8]) {
        if self.is_identifying() {
            return;
        }
        self.state = UploadState::Previewing(ImageDraft::from_file(file_name, bytes));
        self.error = None;
    }

    /// Drag-drop selection. Payloads whose media type is not an image are
    /// rejected without leaving the current state.
    pub fn drop_file(&mut self, file_name: &str, bytes: &[u8]) {
        if self.is_identifying() {
            return;
        }
        if !is_image_media_type(media_type_for_file(file_name)) {
            self.error = Some(ERR_DROP_NOT_IMAGE);
            return;
        }
        self.state = UploadState::Previewing(ImageDraft::from_file(file_name, bytes));
        self.error = None;
    }

    /// Explicit "Clear". No session side effects.
    pub fn clear(&mut self) {
        if self.is_identifying() {
            return;
        }
        self.state = UploadState::Idle;
        self.error = None;
    }

    /// Move to `Identifying` and hand the encoded image to the caller,
    /// which owns issuing the request. `None` (plus an inline error) when
    /// nothing is selected or a request is already in flight.
    pub fn begin_identify(&mut self) -> Option<DataUrl> {
        match &self.state {
            UploadState::Idle => {
                self.error = Some(ERR_NO_SELECTION);
                None
            }
            UploadState::Identifying(_) => None,
            UploadState::Previewing(draft) => {
                let image = draft.data_url.clone();
                self.state = UploadState::Identifying(draft.clone());
                self.error = None;
                Some(image)
            }
        }
    }

    /// Request failed: back to `Previewing` with the selection intact.
    pub fn fail_identify(&mut self) {
        if let UploadState::Identifying(draft) = &self.state {
            self.state = UploadState::Previewing(draft.clone());
            self.error = Some(ERR_IDENTIFY_FAILED);
        }
    }
}

/// Session overlay for a successful identification: word pair, examples
/// and the identified image land in one patch.
#[must_use]
pub fn identification_patch(identification: Identification, image: DataUrl) -> SessionPatch {
    SessionPatch {
        english_word: Some(identification.object),
        french_word: Some(identification.french_word),
        examples: Some(identification.examples),
        image_data: Some(image),
        ..SessionPatch::default()
    }
}
