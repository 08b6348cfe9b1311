//! Converts pages and blocks to HTML for the editor canvas and the preview.
//! Text is escaped, rich text is normalised, and unsafe URLs are dropped.
//! Output never contains scripts or inline event handlers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::sync::OnceLock;

use crate::block::{Block, BlockContent, TextField};
use crate::content::*;
use crate::ids::BlockId;
use crate::page::Page;
use crate::publish::activity_url;
use crate::resize::ResizeHandle;
use crate::richtext::{escape_html, sanitize_markup};
use crate::surface::RichTextSurface;
use crate::validator::is_safe_url;

const BASE_STYLES: &str = "html,body{margin:0;font-family:system-ui,sans-serif;color:#1f2937;}\
.pc-canvas{max-width:960px;margin:0 auto;padding:2rem 1.5rem;min-height:100vh;box-sizing:border-box;}\
.pc-block{position:relative;margin:0 0 1.25rem;}\
.pc-block.pc-selected{outline:2px solid #4f46e5;outline-offset:4px;}\
.pc-full-bleed{margin-left:calc(50% - 50vw);margin-right:calc(50% - 50vw);}\
.pc-block-controls{position:absolute;top:-2.25rem;right:0;display:flex;gap:0.25rem;}\
.pc-rich.pc-empty:before{content:attr(data-placeholder);color:#9ca3af;}\
.pc-toolbar{display:flex;gap:0.25rem;margin-top:0.25rem;}\
.pc-handle{position:absolute;width:10px;height:10px;background:#4f46e5;border:1px solid #fff;}\
.pc-handle-nw{top:-5px;left:-5px;cursor:nwse-resize;}\
.pc-handle-ne{top:-5px;right:-5px;cursor:nesw-resize;}\
.pc-handle-sw{bottom:-5px;left:-5px;cursor:nesw-resize;}\
.pc-handle-se{bottom:-5px;right:-5px;cursor:nwse-resize;}\
.pc-handle-s{bottom:-5px;left:calc(50% - 5px);cursor:ns-resize;}\
.pc-placeholder{border:2px dashed #d1d5db;padding:2rem;text-align:center;color:#6b7280;}\
.pc-button{display:inline-block;padding:0.6rem 1.2rem;border-radius:6px;text-decoration:none;}\
.pc-button-solid{background:#4f46e5;color:#fff;}\
.pc-button-outline{border:2px solid #4f46e5;color:#4f46e5;}\
.pc-button-ghost{color:#4f46e5;}\
.pc-mcq-option{list-style:none;margin:0.4rem 0;}\
.pc-mcq-option.pc-correct{font-weight:600;color:#047857;}\
.pc-banner{position:relative;background-size:cover;background-position:center;display:flex;align-items:center;justify-content:center;}\
.pc-banner-overlay{position:absolute;inset:0;}\
.pc-banner-title{position:relative;color:#fff;font-size:2rem;}\
.pc-code{background:#111827;color:#e5e7eb;padding:1rem;border-radius:8px;overflow-x:auto;}\
.pc-code-editor{width:100%;min-height:10rem;font-family:monospace;}\
.pc-hotspot-image{position:relative;display:inline-block;}\
.pc-hotspot{position:absolute;transform:translate(-50%,-50%);border-radius:50%;}\
.pc-browser{border:1px solid #d1d5db;border-radius:10px;overflow:hidden;}\
.pc-browser-bar{display:flex;gap:0.75rem;align-items:center;padding:0.5rem 0.75rem;background:#f3f4f6;}\
.pc-browser-url{flex:1;background:#fff;border-radius:6px;padding:0.2rem 0.6rem;font-size:0.85rem;}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Edit,
    Preview,
}

/// Where a block sits and whether it is the selected one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: RenderMode,
    pub selected: bool,
    pub index: usize,
    pub count: usize,
}

impl RenderContext {
    pub fn preview() -> Self {
        Self {
            mode: RenderMode::Preview,
            selected: false,
            index: 0,
            count: 1,
        }
    }

    fn editing(&self) -> bool {
        self.mode == RenderMode::Edit
    }

    fn active(&self) -> bool {
        self.editing() && self.selected
    }
}

/// Browser-window chrome showing the link the page will be served at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserFrame {
    pub url: String,
}

impl BrowserFrame {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn for_page(host: &str, page: &Page) -> Self {
        Self::new(activity_url(host, &page.slug))
    }

    pub fn wrap(&self, inner: &str) -> String {
        format!(
            "<div class=\"pc-browser\"><div class=\"pc-browser-bar\"><span class=\"pc-browser-dots\">&#9679; &#9679; &#9679;</span><span class=\"pc-browser-url\">{}</span></div><div class=\"pc-browser-body\">{}</div></div>",
            escape_html(&self.url),
            inner
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    pub mode: RenderMode,
    pub selected: Option<BlockId>,
    pub frame: Option<BrowserFrame>,
}

/// Full standalone HTML document for a page
pub fn render_document(page: &Page, options: &DocumentOptions) -> String {
    let body = render_page(page, options.mode, options.selected.as_ref());
    let body = match &options.frame {
        Some(frame) => frame.wrap(&body),
        None => body,
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        escape_html(&page.title),
        BASE_STYLES,
        body
    )
}

/// The canvas: page background plus every block in order
pub fn render_page(page: &Page, mode: RenderMode, selected: Option<&BlockId>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"pc-canvas\" style=\"background-color:{};\">",
        escape_html(&page.background_color)
    );
    if page.blocks.is_empty() && mode == RenderMode::Edit {
        out.push_str(
            "<div class=\"pc-placeholder pc-empty-canvas\">Add a block or apply a template to get started</div>",
        );
    }
    let count = page.blocks.len();
    for (index, block) in page.blocks.iter().enumerate() {
        let ctx = RenderContext {
            mode,
            selected: mode == RenderMode::Edit && selected == Some(&block.id),
            index,
            count,
        };
        out.push_str(&render_block(block, &ctx));
    }
    out.push_str("</div>");
    out
}

/// One block, wrapped with its edit affordances when in edit mode.
/// Returns an empty string for blocks that have nothing to show in preview.
pub fn render_block(block: &Block, ctx: &RenderContext) -> String {
    let mut inner = String::new();
    if write_content(&mut inner, block, ctx).is_err() {
        tracing::warn!(block = %block.id, "failed to render block");
        return String::new();
    }
    if inner.is_empty() {
        return String::new();
    }

    let block_type = block.block_type();
    let mut classes = format!("pc-block pc-block-{}", block_type);
    if matches!(block.content, BlockContent::Banner(_)) {
        classes.push_str(" pc-full-bleed");
    }

    let mut out = String::new();
    if !ctx.editing() {
        let _ = write!(out, "<div class=\"{}\">{}</div>", classes, inner);
        return out;
    }
    if ctx.selected {
        classes.push_str(" pc-selected");
    }
    let _ = write!(
        out,
        "<div class=\"{}\" data-block-id=\"{}\" data-block-type=\"{}\">",
        classes,
        escape_html(block.id.as_str()),
        block_type
    );
    if ctx.selected {
        write_controls(&mut out, ctx);
    }
    out.push_str(&inner);
    out.push_str("</div>");
    out
}

fn write_controls(out: &mut String, ctx: &RenderContext) {
    let up = if ctx.index == 0 { " disabled" } else { "" };
    let down = if ctx.index + 1 >= ctx.count { " disabled" } else { "" };
    let _ = write!(
        out,
        "<div class=\"pc-block-controls\">\
<button type=\"button\" data-action=\"move-up\" title=\"Move up\"{}>&#8593;</button>\
<button type=\"button\" data-action=\"move-down\" title=\"Move down\"{}>&#8595;</button>\
<button type=\"button\" data-action=\"delete\" title=\"Delete\">&#10005;</button></div>",
        up, down
    );
}

fn write_handles(out: &mut String, block: &Block) {
    for handle in ResizeHandle::for_block_type(block.block_type()) {
        let _ = write!(
            out,
            "<span class=\"pc-handle pc-handle-{0}\" data-handle=\"{0}\"></span>",
            handle.as_str()
        );
    }
}

/// Rich-text region: editable surface in edit mode, static markup in preview
fn rich(value: &str, field: &TextField, placeholder: &str, align: TextAlign, ctx: &RenderContext) -> String {
    RichTextSurface::new(value, placeholder, align)
        .read_only(!ctx.editing())
        .render_html(&field.key())
}

fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() || url.chars().any(char::is_control) || !is_safe_url(url) {
        None
    } else {
        Some(url)
    }
}

/// Escaped for use inside `url('...')` in a style attribute
fn css_url(url: &str) -> String {
    escape_html(url)
        .replace('\'', "%27")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// `watch?v=` and `youtu.be/` links become embeddable player URLs
pub fn video_embed_url(url: &str) -> String {
    static YOUTUBE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = YOUTUBE_REGEX.get_or_init(|| {
        Regex::new(r"^https?://(?:www\.|m\.)?(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/)([A-Za-z0-9_-]{6,})")
            .unwrap()
    });
    match re.captures(url.trim()) {
        Some(caps) => format!("https://www.youtube.com/embed/{}", &caps[1]),
        None => url.trim().to_string(),
    }
}

fn placeholder(out: &mut String, text: &str) -> fmt::Result {
    write!(out, "<div class=\"pc-placeholder\">{}</div>", escape_html(text))
}

fn write_content(out: &mut String, block: &Block, ctx: &RenderContext) -> fmt::Result {
    match &block.content {
        BlockContent::Heading(h) => {
            let level = h.level.clamp(1, 6);
            write!(
                out,
                "<h{0} class=\"pc-heading\">{1}</h{0}>",
                level,
                rich(&h.text, &TextField::Heading, "Heading", h.align, ctx)
            )
        }
        BlockContent::Text(t) => out.write_str(&rich(
            &t.text,
            &TextField::Paragraph,
            "Start typing...",
            t.align,
            ctx,
        )),
        BlockContent::Image(img) => write_image(out, block, img, ctx),
        BlockContent::Video(v) => match safe_url(&v.url) {
            Some(url) => write!(
                out,
                "<div class=\"pc-video\"><iframe src=\"{}\" width=\"100%\" height=\"400\" frameborder=\"0\" allowfullscreen></iframe></div>",
                escape_html(&video_embed_url(url))
            ),
            None if ctx.editing() => placeholder(out, "Add a video URL in the properties panel"),
            None => Ok(()),
        },
        BlockContent::Button(b) => {
            let label = rich(&b.text, &TextField::ButtonLabel, "Button", TextAlign::Left, ctx);
            let style = match b.style {
                ButtonStyle::Solid => "solid",
                ButtonStyle::Outline => "outline",
                ButtonStyle::Ghost => "ghost",
            };
            write!(out, "<div style=\"text-align:{};\">", b.align.as_css())?;
            match (ctx.editing(), safe_url(&b.url)) {
                (false, Some(url)) => write!(
                    out,
                    "<a class=\"pc-button pc-button-{}\" href=\"{}\">{}</a>",
                    style,
                    escape_html(url),
                    label
                )?,
                _ => write!(
                    out,
                    "<span class=\"pc-button pc-button-{}\">{}</span>",
                    style, label
                )?,
            }
            out.write_str("</div>")
        }
        BlockContent::Icon(icon) => write!(
            out,
            "<div style=\"text-align:{};\"><i class=\"pc-icon pc-icon-{}\" data-icon=\"{}\" style=\"color:{};font-size:{}px;\" aria-hidden=\"true\"></i></div>",
            icon.align.as_css(),
            escape_html(&icon.icon_name),
            escape_html(&icon.icon_name),
            escape_html(&icon.color),
            icon.size
        ),
        BlockContent::Mcq(mcq) => write_mcq(out, block, mcq, ctx),
        BlockContent::Process(p) => {
            out.write_str("<ol class=\"pc-process\">")?;
            for step in &p.steps {
                write!(
                    out,
                    "<li class=\"pc-step\" data-step-id=\"{}\"><div class=\"pc-step-title\">{}</div><div class=\"pc-step-description\">{}</div></li>",
                    escape_html(&step.id),
                    rich(&step.title, &TextField::StepTitle(step.id.clone()), "Step title", TextAlign::Left, ctx),
                    rich(
                        &step.description,
                        &TextField::StepDescription(step.id.clone()),
                        "Describe this step",
                        TextAlign::Left,
                        ctx
                    )
                )?;
            }
            out.write_str("</ol>")
        }
        BlockContent::Code(c) => {
            if ctx.active() {
                write!(
                    out,
                    "<div class=\"pc-code-edit\"><span class=\"pc-code-language\">{}</span><textarea class=\"pc-code-editor\" data-field=\"code\" spellcheck=\"false\">{}</textarea></div>",
                    escape_html(&c.language),
                    escape_html(&c.code)
                )
            } else {
                write!(
                    out,
                    "<pre class=\"pc-code\"><code class=\"language-{}\">{}</code></pre>",
                    escape_html(&c.language),
                    escape_html(&c.code)
                )
            }
        }
        BlockContent::Embed(e) => match safe_url(&e.url) {
            Some(url) => write!(
                out,
                "<iframe class=\"pc-embed\" src=\"{}\" width=\"100%\" height=\"{}\" frameborder=\"0\" sandbox=\"allow-scripts allow-same-origin allow-forms allow-popups\"></iframe>",
                escape_html(url),
                e.height
            ),
            None if ctx.editing() => placeholder(out, "Add an embed URL in the properties panel"),
            None => Ok(()),
        },
        BlockContent::Banner(b) => {
            write!(out, "<div class=\"pc-banner\" style=\"height:{}px;", b.height)?;
            if let Some(url) = safe_url(&b.url) {
                write!(out, "background-image:url('{}');", css_url(url))?;
            }
            write!(
                out,
                "\"><div class=\"pc-banner-overlay\" style=\"background:rgba(0,0,0,{});\"></div><div class=\"pc-banner-title\">{}</div>",
                b.overlay_opacity.clamp(0.0, 1.0),
                rich(&b.text, &TextField::BannerTitle, "Banner title", TextAlign::Center, ctx)
            )?;
            if ctx.active() {
                write_handles(out, block);
            }
            out.write_str("</div>")
        }
        BlockContent::List(list) => {
            let tag = match list.style {
                ListStyle::Bullet => "ul",
                ListStyle::Numbered => "ol",
            };
            write!(out, "<{} class=\"pc-list\">", tag)?;
            for item in &list.items {
                write!(out, "<li>{}</li>", sanitize_markup(item))?;
            }
            write!(out, "</{}>", tag)
        }
        BlockContent::Flashcard(deck) => {
            out.write_str("<div class=\"pc-flashcards\">")?;
            for card in &deck.cards {
                write!(
                    out,
                    "<div class=\"pc-flashcard\" data-card-id=\"{}\"><div class=\"pc-flashcard-front\">",
                    escape_html(&card.id)
                )?;
                if let Some(img) = safe_url(&card.image) {
                    write!(out, "<img src=\"{}\" alt=\"\">", escape_html(img))?;
                }
                write!(
                    out,
                    "{}</div><div class=\"pc-flashcard-back\">{}</div></div>",
                    sanitize_markup(&card.front),
                    sanitize_markup(&card.back)
                )?;
            }
            out.write_str("</div>")
        }
        BlockContent::Hotspot(h) => {
            let Some(url) = safe_url(&h.url) else {
                return if ctx.editing() {
                    placeholder(out, "Upload an image to place hotspots")
                } else {
                    Ok(())
                };
            };
            write!(
                out,
                "<div class=\"pc-hotspot-image\"><img src=\"{}\" alt=\"\">",
                escape_html(url)
            )?;
            for (n, spot) in h.hotspots.iter().enumerate() {
                write!(
                    out,
                    "<button type=\"button\" class=\"pc-hotspot\" data-hotspot-id=\"{}\" style=\"left:{}%;top:{}%;\" title=\"{}\">{}</button>",
                    escape_html(&spot.id),
                    spot.x.clamp(0.0, 100.0),
                    spot.y.clamp(0.0, 100.0),
                    escape_html(&spot.content),
                    n + 1
                )?;
            }
            out.write_str("</div>")
        }
    }
}

fn write_image(out: &mut String, block: &Block, img: &ImageContent, ctx: &RenderContext) -> fmt::Result {
    let Some(url) = safe_url(&img.url) else {
        if ctx.editing() {
            out.write_str(
                "<div class=\"pc-placeholder pc-image-chooser\">\
<button type=\"button\" data-action=\"upload\">Upload image</button>\
<input type=\"url\" data-field=\"url\" placeholder=\"or paste an image URL\"></div>",
            )?;
        }
        return Ok(());
    };
    write!(
        out,
        "<div class=\"pc-image\" style=\"position:relative;display:inline-block;width:{0}px;height:{1}px;\"><img src=\"{2}\" alt=\"{3}\" width=\"{0}\" height=\"{1}\" style=\"width:100%;height:100%;object-fit:cover;\">",
        img.width,
        img.height,
        escape_html(url),
        escape_html(&img.alt_text)
    )?;
    if ctx.active() {
        write_handles(out, block);
    }
    out.write_str("</div>")
}

fn write_mcq(out: &mut String, block: &Block, mcq: &McqContent, ctx: &RenderContext) -> fmt::Result {
    write!(
        out,
        "<div class=\"pc-mcq\"><div class=\"pc-mcq-question\">{}</div><ul class=\"pc-mcq-options\">",
        rich(&mcq.question, &TextField::Question, "Question", TextAlign::Left, ctx)
    )?;
    for option in &mcq.options {
        let text = rich(
            &option.text,
            &TextField::Option(option.id.clone()),
            "Option",
            TextAlign::Left,
            ctx,
        );
        if ctx.editing() {
            let correct = mcq.is_correct(&option.id);
            write!(
                out,
                "<li class=\"pc-mcq-option{}\" data-option-id=\"{}\"><button type=\"button\" data-action=\"mark-correct\" aria-pressed=\"{}\">&#10003;</button>{}</li>",
                if correct { " pc-correct" } else { "" },
                escape_html(&option.id),
                correct,
                text
            )?;
        } else {
            write!(
                out,
                "<li class=\"pc-mcq-option\"><label><input type=\"radio\" name=\"mcq-{}\" value=\"{}\"> {}</label></li>",
                escape_html(block.id.as_str()),
                escape_html(&option.id),
                text
            )?;
        }
    }
    out.write_str("</ul>")?;
    if ctx.editing() {
        out.write_str("<button type=\"button\" data-action=\"add-option\">Add option</button>")?;
    } else if !mcq.feedback.is_empty() {
        write!(
            out,
            "<div class=\"pc-mcq-feedback\" hidden>{}</div>",
            sanitize_markup(&mcq.feedback)
        )?;
    }
    out.write_str("</div>")
}
