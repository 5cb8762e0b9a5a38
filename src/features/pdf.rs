//! PDF embed rewriting
//!
//! pandoc leaves `\includegraphics{...pdf}` behind as Markdown image
//! links, which browsers will not render. This pass rewrites
//! `![alt](file.pdf)` into a `<figure><embed>` block; the caption is the
//! alt text, or the file name (separators spaced out) when the alt text
//! is empty or the pandoc placeholder `image`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PDF_IMAGE: Regex = Regex::new(r"(?i)!\[([^\]]*)\]\(([^)]+\.pdf)\)").unwrap();
    static ref NAME_SEPARATORS: Regex = Regex::new(r"[_-]+").unwrap();
}

/// Rewrites PDF image links into embed figures.
pub fn embed_pdf_links(markdown: &str) -> String {
    PDF_IMAGE
        .replace_all(markdown, |caps: &regex::Captures| {
            let alt = caps[1].trim().to_string();
            let pdf_path = &caps[2];
            let caption = if !alt.is_empty() && alt.to_lowercase() != "image" {
                alt
            } else {
                fallback_caption(pdf_path)
            };
            format!(
                "\n<figure>\n  <embed src=\"{}\"\n         type=\"application/pdf\"\n         \
                 width=\"100%\"\n         height=\"460px\" />\n  <figcaption>{}</figcaption>\n\
                 </figure>",
                pdf_path, caption
            )
        })
        .into_owned()
}

fn fallback_caption(pdf_path: &str) -> String {
    let file_name = pdf_path.rsplit('/').next().unwrap_or(pdf_path);
    let stem = file_name.strip_suffix(".pdf").unwrap_or(file_name);
    NAME_SEPARATORS.replace_all(stem, " ").into_owned()
}
