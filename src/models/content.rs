use serde::Serialize;

/// Classified source kind of a lesson's raw `video_url` string.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    VideoYoutube,
    VideoVimeo,
    VideoDirect,
    VideoArchive,
    DocumentDrive,
    DocumentPdf,
    Unknown,
}

impl SourceKind {
    pub const ALL: [SourceKind; 7] = [
        SourceKind::VideoYoutube,
        SourceKind::VideoVimeo,
        SourceKind::VideoDirect,
        SourceKind::VideoArchive,
        SourceKind::DocumentDrive,
        SourceKind::DocumentPdf,
        SourceKind::Unknown,
    ];

    pub fn is_video(&self) -> bool {
        matches!(
            self,
            SourceKind::VideoYoutube
                | SourceKind::VideoVimeo
                | SourceKind::VideoDirect
                | SourceKind::VideoArchive
        )
    }
}

/// Derived, never stored. Output of the source resolver cascade.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub embed_url: String,
    pub download_url: Option<String>,
    pub external_id: Option<String>,
}

impl ResolvedSource {
    pub fn unknown(raw: &str) -> Self {
        ResolvedSource {
            kind: SourceKind::Unknown,
            embed_url: raw.to_string(),
            download_url: None,
            external_id: None,
        }
    }
}

/// Derived, never stored. `AdminOverride` renders like `Granted` but is
/// logged distinctly because it bypasses commercial gating.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDecision {
    Granted,
    AdminOverride,
    Locked,
}

impl AccessDecision {
    pub fn allows_content(&self) -> bool {
        matches!(self, AccessDecision::Granted | AccessDecision::AdminOverride)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerMode {
    InlineVideo,
    VimeoPlayer,
    ArchivePlayer,
    NativeVideo,
    DocumentFrame,
    LockedPrompt,
    Unsupported,
}

/// Instruction to the rendering layer: which viewer to mount and with what
/// parameters. For `LockedPrompt` every content field is empty and only
/// `redirect_target` is set.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ViewerDirective {
    pub mode: ViewerMode,
    pub embed_url: Option<String>,
    pub external_id: Option<String>,
    pub download_url: Option<String>,
    pub open_externally_url: Option<String>,
    pub redirect_target: Option<String>,
    pub show_notes_pane: bool,
    /// Cover provider chrome/branding with an overlay (document viewers).
    pub mask_provider_chrome: bool,
    /// Soft deterrents for direct video files (controlsList analog plus
    /// context-menu suppression). Deterrents only, not a security boundary:
    /// the media URL is still reachable by anyone holding the directive.
    pub disable_download_hint: bool,
    pub suppress_context_menu: bool,
}

impl ViewerDirective {
    pub fn bare(mode: ViewerMode, show_notes_pane: bool) -> Self {
        ViewerDirective {
            mode,
            embed_url: None,
            external_id: None,
            download_url: None,
            open_externally_url: None,
            redirect_target: None,
            show_notes_pane,
            mask_provider_chrome: false,
            disable_download_hint: false,
            suppress_context_menu: false,
        }
    }
}
