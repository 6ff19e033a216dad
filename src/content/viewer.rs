use crate::models::content::{
    AccessDecision, ResolvedSource, SourceKind, ViewerDirective, ViewerMode,
};

pub fn buy_course_route(course_id: i32) -> String {
    format!("/buy-course?id={}", course_id)
}

/// Picks the concrete viewer for a resolved source under an access decision.
///
/// The locked branch comes first, ahead of any source-kind dispatch: a
/// viewer-specific code path can never be reached with locked content, so no
/// embed or download URL ever leaks into a locked directive.
pub fn select(
    resolved: &ResolvedSource,
    decision: AccessDecision,
    course_id: i32,
) -> ViewerDirective {
    if decision == AccessDecision::Locked {
        let mut directive = ViewerDirective::bare(ViewerMode::LockedPrompt, false);
        directive.redirect_target = Some(buy_course_route(course_id));
        return directive;
    }

    let show_notes_pane = resolved.kind.is_video();

    match resolved.kind {
        SourceKind::VideoYoutube => {
            let mut directive = ViewerDirective::bare(ViewerMode::InlineVideo, show_notes_pane);
            directive.embed_url = Some(resolved.embed_url.clone());
            directive.external_id = resolved.external_id.clone();
            directive
        }
        SourceKind::VideoVimeo => {
            let mut directive = ViewerDirective::bare(ViewerMode::VimeoPlayer, show_notes_pane);
            directive.embed_url = Some(resolved.embed_url.clone());
            directive.external_id = resolved.external_id.clone();
            directive
        }
        SourceKind::VideoArchive => {
            let mut directive = ViewerDirective::bare(ViewerMode::ArchivePlayer, show_notes_pane);
            directive.embed_url = Some(resolved.embed_url.clone());
            directive.external_id = resolved.external_id.clone();
            directive.open_externally_url = resolved.download_url.clone();
            directive
        }
        SourceKind::VideoDirect => {
            let mut directive = ViewerDirective::bare(ViewerMode::NativeVideo, show_notes_pane);
            directive.embed_url = Some(resolved.embed_url.clone());
            // Soft deterrents only. Anyone holding the directive still has
            // the media URL.
            directive.disable_download_hint = true;
            directive.suppress_context_menu = true;
            directive
        }
        SourceKind::DocumentDrive | SourceKind::DocumentPdf => {
            let mut directive = ViewerDirective::bare(ViewerMode::DocumentFrame, show_notes_pane);
            directive.embed_url = Some(resolved.embed_url.clone());
            directive.external_id = resolved.external_id.clone();
            directive.mask_provider_chrome = true;
            directive.open_externally_url = Some(resolved.embed_url.clone());
            directive.download_url = resolved.download_url.clone();
            directive
        }
        SourceKind::Unknown => ViewerDirective::bare(ViewerMode::Unsupported, false),
    }
}

/// Tags an in-flight resolution with the lesson it was issued for. When the
/// client navigates between lessons rapidly, a directive that arrives for a
/// lesson no longer on screen is discarded instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTicket {
    lesson_id: i32,
}

impl ViewTicket {
    pub fn new(lesson_id: i32) -> Self {
        ViewTicket { lesson_id }
    }

    pub fn lesson_id(&self) -> i32 {
        self.lesson_id
    }

    pub fn accept(
        &self,
        current_lesson_id: i32,
        directive: ViewerDirective,
    ) -> Option<ViewerDirective> {
        if self.lesson_id == current_lesson_id {
            Some(directive)
        } else {
            tracing::debug!(
                issued_for = self.lesson_id,
                current = current_lesson_id,
                "discarding stale viewer directive"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::resolver::resolve;

    fn sample_source(kind: SourceKind) -> ResolvedSource {
        match kind {
            SourceKind::VideoYoutube => resolve("https://youtu.be/dQw4w9WgXcQ"),
            SourceKind::VideoVimeo => resolve("https://vimeo.com/76979871"),
            SourceKind::VideoDirect => resolve("https://cdn.example.com/lec.mp4"),
            SourceKind::VideoArchive => resolve("https://archive.org/details/item-1"),
            SourceKind::DocumentDrive => resolve("https://drive.google.com/file/d/ABC123/view"),
            SourceKind::DocumentPdf => resolve("https://cdn.example.com/ch1.pdf"),
            SourceKind::Unknown => resolve("garbage input"),
        }
    }

    #[test]
    fn locked_decision_always_yields_locked_prompt() {
        // Exhaustive over every source kind: no viewer path may leak.
        for kind in SourceKind::ALL {
            let directive = select(&sample_source(kind), AccessDecision::Locked, 7);
            assert_eq!(directive.mode, ViewerMode::LockedPrompt, "kind {:?}", kind);
            assert_eq!(directive.embed_url, None, "kind {:?}", kind);
            assert_eq!(directive.download_url, None, "kind {:?}", kind);
            assert_eq!(directive.external_id, None, "kind {:?}", kind);
            assert_eq!(
                directive.redirect_target.as_deref(),
                Some("/buy-course?id=7"),
                "kind {:?}",
                kind
            );
        }
    }

    #[test]
    fn youtube_granted_mounts_inline_video_with_notes() {
        let directive = select(
            &sample_source(SourceKind::VideoYoutube),
            AccessDecision::Granted,
            1,
        );
        assert_eq!(directive.mode, ViewerMode::InlineVideo);
        assert!(directive.show_notes_pane);
        assert_eq!(directive.external_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn notes_pane_follows_content_kind() {
        for kind in SourceKind::ALL {
            let directive = select(&sample_source(kind), AccessDecision::Granted, 1);
            assert_eq!(directive.show_notes_pane, kind.is_video(), "kind {:?}", kind);
        }
    }

    #[test]
    fn native_video_carries_soft_deterrent_hints() {
        let directive = select(
            &sample_source(SourceKind::VideoDirect),
            AccessDecision::Granted,
            1,
        );
        assert_eq!(directive.mode, ViewerMode::NativeVideo);
        assert!(directive.disable_download_hint);
        assert!(directive.suppress_context_menu);
    }

    #[test]
    fn documents_get_masking_overlay_and_action_pair() {
        for kind in [SourceKind::DocumentDrive, SourceKind::DocumentPdf] {
            let directive = select(&sample_source(kind), AccessDecision::Granted, 1);
            assert_eq!(directive.mode, ViewerMode::DocumentFrame, "kind {:?}", kind);
            assert!(directive.mask_provider_chrome);
            assert!(directive.open_externally_url.is_some());
            assert!(directive.download_url.is_some());
            assert!(!directive.show_notes_pane);
        }
    }

    #[test]
    fn unknown_source_is_an_explicit_unsupported_state() {
        let directive = select(
            &sample_source(SourceKind::Unknown),
            AccessDecision::Granted,
            1,
        );
        assert_eq!(directive.mode, ViewerMode::Unsupported);
    }

    #[test]
    fn admin_override_renders_like_granted() {
        let directive = select(
            &sample_source(SourceKind::VideoYoutube),
            AccessDecision::AdminOverride,
            1,
        );
        assert_eq!(directive.mode, ViewerMode::InlineVideo);
    }

    #[test]
    fn stale_ticket_discards_late_directive() {
        let ticket = ViewTicket::new(10);
        let directive = select(
            &sample_source(SourceKind::VideoYoutube),
            AccessDecision::Granted,
            1,
        );

        assert!(ticket.accept(11, directive.clone()).is_none());
        assert_eq!(ticket.accept(10, directive.clone()), Some(directive));
    }
}
