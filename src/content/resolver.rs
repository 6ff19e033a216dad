use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::content::{ResolvedSource, SourceKind};

// Drive id extraction: path form first, query form second.
static DRIVE_PATH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").unwrap());
static DRIVE_QUERY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").unwrap());

static YOUTUBE_URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});
// Anchored on both ends: an 11-char fragment inside some longer string must
// never pass as a bare video id.
static YOUTUBE_BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

static VIMEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"vimeo\.com/(\d+)").unwrap());

static ARCHIVE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"archive\.org/(?:details|embed)/([^/?#\s]+)").unwrap());

/// Classifies a lesson's raw source string and derives its embeddable form.
///
/// Pure function, no I/O. The classifiers run as a fixed priority list and
/// the first match wins: patterns overlap textually (a Drive link whose file
/// name contains "pdf" must classify as Drive, not PDF), so order is part of
/// the contract.
pub fn resolve(raw_url: &str) -> ResolvedSource {
    let url = raw_url.trim();
    if url.is_empty() {
        return ResolvedSource::unknown(url);
    }

    let classifiers: [fn(&str) -> Option<ResolvedSource>; 6] = [
        classify_drive,
        classify_youtube,
        classify_vimeo,
        classify_archive,
        classify_pdf,
        classify_direct_media,
    ];

    for classify in classifiers {
        if let Some(resolved) = classify(url) {
            return resolved;
        }
    }

    ResolvedSource::unknown(url)
}

fn classify_drive(url: &str) -> Option<ResolvedSource> {
    let looks_like_drive = url.contains("drive.google.com")
        || DRIVE_PATH_ID.is_match(url)
        || DRIVE_QUERY_ID.is_match(url);
    if !looks_like_drive {
        return None;
    }

    // Both extraction forms are attempted, first non-null wins.
    let id = DRIVE_PATH_ID
        .captures(url)
        .or_else(|| DRIVE_QUERY_ID.captures(url))
        .map(|caps| caps[1].to_string());

    Some(match id {
        Some(id) => ResolvedSource {
            kind: SourceKind::DocumentDrive,
            embed_url: format!("https://drive.google.com/file/d/{}/preview", id),
            download_url: Some(format!(
                "https://drive.google.com/uc?export=download&id={}",
                id
            )),
            external_id: Some(id),
        },
        // Drive host without an extractable id: still a Drive document, the
        // viewer falls back to the raw link.
        None => ResolvedSource {
            kind: SourceKind::DocumentDrive,
            embed_url: url.to_string(),
            download_url: None,
            external_id: None,
        },
    })
}

fn classify_youtube(url: &str) -> Option<ResolvedSource> {
    let id = YOUTUBE_URL_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
        .or_else(|| {
            YOUTUBE_BARE_ID
                .is_match(url)
                .then(|| url.to_string())
        })?;

    Some(ResolvedSource {
        kind: SourceKind::VideoYoutube,
        // Privacy-enhanced embed host.
        embed_url: format!("https://www.youtube-nocookie.com/embed/{}", id),
        download_url: None,
        external_id: Some(id),
    })
}

fn classify_vimeo(url: &str) -> Option<ResolvedSource> {
    let id = VIMEO_ID.captures(url).map(|caps| caps[1].to_string())?;

    Some(ResolvedSource {
        kind: SourceKind::VideoVimeo,
        embed_url: format!("https://player.vimeo.com/video/{}", id),
        download_url: None,
        external_id: Some(id),
    })
}

fn classify_archive(url: &str) -> Option<ResolvedSource> {
    let id = ARCHIVE_ID.captures(url).map(|caps| caps[1].to_string())?;

    Some(ResolvedSource {
        kind: SourceKind::VideoArchive,
        embed_url: format!("https://archive.org/embed/{}", id),
        download_url: Some(format!("https://archive.org/details/{}", id)),
        external_id: Some(id),
    })
}

fn path_portion(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

fn classify_pdf(url: &str) -> Option<ResolvedSource> {
    if !path_portion(url).to_ascii_lowercase().ends_with(".pdf") {
        return None;
    }

    // Hide the PDF viewer chrome unless the url already pins a fragment.
    let embed_url = if url.contains('#') {
        url.to_string()
    } else {
        format!("{}#toolbar=0&navpanes=0", url)
    };

    Some(ResolvedSource {
        kind: SourceKind::DocumentPdf,
        embed_url,
        download_url: Some(url.to_string()),
        external_id: None,
    })
}

fn classify_direct_media(url: &str) -> Option<ResolvedSource> {
    let path = path_portion(url).to_ascii_lowercase();
    if !path.ends_with(".mp4") && !path.ends_with(".webm") {
        return None;
    }

    Some(ResolvedSource {
        kind: SourceKind::VideoDirect,
        embed_url: url.to_string(),
        download_url: Some(url.to_string()),
        external_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_path_form_classifies_as_drive() {
        let resolved = resolve("https://drive.google.com/file/d/ABC123/view");
        assert_eq!(resolved.kind, SourceKind::DocumentDrive);
        assert_eq!(resolved.external_id.as_deref(), Some("ABC123"));
        assert_eq!(
            resolved.embed_url,
            "https://drive.google.com/file/d/ABC123/preview"
        );
        assert_eq!(
            resolved.download_url.as_deref(),
            Some("https://drive.google.com/uc?export=download&id=ABC123")
        );
    }

    #[test]
    fn drive_query_form_classifies_as_drive() {
        let resolved = resolve("https://drive.google.com/open?id=XyZ_9-abc");
        assert_eq!(resolved.kind, SourceKind::DocumentDrive);
        assert_eq!(resolved.external_id.as_deref(), Some("XyZ_9-abc"));
    }

    #[test]
    fn drive_path_form_wins_over_query_form() {
        let resolved = resolve("https://drive.google.com/file/d/PATHID/view?id=QUERYID");
        assert_eq!(resolved.external_id.as_deref(), Some("PATHID"));
    }

    #[test]
    fn drive_beats_pdf_even_with_pdf_in_the_name() {
        let resolved = resolve("https://drive.google.com/file/d/notes2024/view?name=syllabus.pdf");
        assert_eq!(resolved.kind, SourceKind::DocumentDrive);
    }

    #[test]
    fn drive_host_without_id_still_classifies_as_drive() {
        let resolved = resolve("https://drive.google.com/drive/folders");
        assert_eq!(resolved.kind, SourceKind::DocumentDrive);
        assert_eq!(resolved.external_id, None);
    }

    #[test]
    fn youtube_watch_url() {
        let resolved = resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(resolved.kind, SourceKind::VideoYoutube);
        assert_eq!(resolved.external_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            resolved.embed_url,
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn youtube_watch_url_with_leading_params() {
        let resolved = resolve("https://www.youtube.com/watch?t=42&v=dQw4w9WgXcQ");
        assert_eq!(resolved.external_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn youtube_short_link() {
        let resolved = resolve("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(resolved.kind, SourceKind::VideoYoutube);
        assert_eq!(resolved.external_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn youtube_embed_and_shorts_links() {
        assert_eq!(
            resolve("https://www.youtube.com/embed/dQw4w9WgXcQ").kind,
            SourceKind::VideoYoutube
        );
        assert_eq!(
            resolve("https://www.youtube.com/shorts/dQw4w9WgXcQ").kind,
            SourceKind::VideoYoutube
        );
    }

    #[test]
    fn bare_eleven_char_id_is_youtube() {
        let resolved = resolve("dQw4w9WgXcQ");
        assert_eq!(resolved.kind, SourceKind::VideoYoutube);
        assert_eq!(resolved.external_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn eleven_char_fragment_of_another_url_is_not_youtube() {
        // Whole string is not an 11-char id and matches no hosted pattern.
        let resolved = resolve("https://example.com/lesson2024x");
        assert_eq!(resolved.kind, SourceKind::Unknown);
    }

    #[test]
    fn vimeo_url() {
        let resolved = resolve("https://vimeo.com/76979871");
        assert_eq!(resolved.kind, SourceKind::VideoVimeo);
        assert_eq!(resolved.external_id.as_deref(), Some("76979871"));
        assert_eq!(resolved.embed_url, "https://player.vimeo.com/video/76979871");
    }

    #[test]
    fn archive_details_url_becomes_embed() {
        let resolved = resolve("https://archive.org/details/physics-course-101");
        assert_eq!(resolved.kind, SourceKind::VideoArchive);
        assert_eq!(resolved.embed_url, "https://archive.org/embed/physics-course-101");
        assert_eq!(
            resolved.download_url.as_deref(),
            Some("https://archive.org/details/physics-course-101")
        );
    }

    #[test]
    fn archive_embed_url_accepted() {
        let resolved = resolve("https://archive.org/embed/physics-course-101");
        assert_eq!(resolved.kind, SourceKind::VideoArchive);
        assert_eq!(resolved.external_id.as_deref(), Some("physics-course-101"));
    }

    #[test]
    fn direct_pdf_gets_toolbar_fragment() {
        let resolved = resolve("https://cdn.example.com/notes/ch1.pdf");
        assert_eq!(resolved.kind, SourceKind::DocumentPdf);
        assert_eq!(
            resolved.embed_url,
            "https://cdn.example.com/notes/ch1.pdf#toolbar=0&navpanes=0"
        );
    }

    #[test]
    fn direct_pdf_with_query_string() {
        let resolved = resolve("https://cdn.example.com/notes/ch1.pdf?token=abc");
        assert_eq!(resolved.kind, SourceKind::DocumentPdf);
        assert_eq!(
            resolved.embed_url,
            "https://cdn.example.com/notes/ch1.pdf?token=abc#toolbar=0&navpanes=0"
        );
    }

    #[test]
    fn pdf_with_existing_fragment_is_left_alone() {
        let resolved = resolve("https://cdn.example.com/ch1.pdf#page=4");
        assert_eq!(resolved.embed_url, "https://cdn.example.com/ch1.pdf#page=4");
    }

    #[test]
    fn direct_media_files() {
        assert_eq!(
            resolve("https://cdn.example.com/lec.mp4").kind,
            SourceKind::VideoDirect
        );
        assert_eq!(
            resolve("https://cdn.example.com/lec.webm?sig=1").kind,
            SourceKind::VideoDirect
        );
    }

    #[test]
    fn garbage_resolves_to_unknown() {
        assert_eq!(resolve("not a url at all").kind, SourceKind::Unknown);
        assert_eq!(resolve("").kind, SourceKind::Unknown);
        assert_eq!(resolve("   ").kind, SourceKind::Unknown);
    }
}
