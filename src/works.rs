//! Portfolio project cards.
//!
//! The records are a static inline list. [`render_cards`] turns them into
//! [`CardBlock`]s appended to a [`CardGrid`]; each block can produce its HTML
//! markup and handles clicks through a [`Navigator`].

use log::{debug, info};
use std::path::Path;

/// URL value meaning "no link yet".
pub const PLACEHOLDER_URL: &str = "#";
/// Shown in place of a missing thumbnail.
pub const PLACEHOLDER_THUMB: &str = "(screenshot later)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectRecord {
    pub title: &'static str,
    /// Technology tags, in display order.
    pub stack: &'static [&'static str],
    /// Relative image path; empty when there is no screenshot.
    pub thumb: &'static str,
    /// External URL or [`PLACEHOLDER_URL`].
    pub url: &'static str,
    pub desc: &'static str,
}

impl ProjectRecord {
    /// The record's link, unless it is missing or the placeholder.
    pub fn href(&self) -> Option<&'static str> {
        (!self.url.is_empty() && self.url != PLACEHOLDER_URL).then_some(self.url)
    }
}

pub const WORKS: &[ProjectRecord] = &[
    ProjectRecord {
        title: "アイルトレイル (WIP)",
        stack: &["Unity", "C#", "タワーディフェンス"],
        thumb: "source/rogue-seas-thumb.png",
        url: "https://github.com/Orca76/rogue-seas",
        desc: "島探索×ローグライク。航海・セントリー召喚。",
    },
    ProjectRecord {
        title: "RUNE CRAFT DUNGEON",
        stack: &["Unity", "C#", "ローグライク"],
        thumb: "source/RuneCraft-thumb.png",
        url: "https://github.com/Orca76/pixelShooting",
        desc: "オリジナル魔法構築、自動生成ダンジョン探索",
    },
    ProjectRecord {
        title: "単語学習アプリ",
        stack: &["Kotlin", "Android Studio", "XML"],
        thumb: "source/studyword_thumb.png",
        url: "#",
        desc: "自分で単語を登録できる学習アプリ　どの分野にも",
    },
    ProjectRecord {
        title: "coin climber",
        stack: &["Unity", "C#", "アーケード"],
        thumb: "source/coincollector_thumb.png",
        url: "https://prtimes.jp/main/html/rd/p/000000026.000016959.html",
        desc: "ジャンプしてコインを集めていく",
    },
    ProjectRecord {
        title: "Hook Adventure",
        stack: &["Unity", "C#", "2Dアクション"],
        thumb: "source/hookAdventure_thumb.gif",
        url: "https://unityroom.com/games/hook_adventure",
        desc: "フックショットでどんどん進め！",
    },
    ProjectRecord {
        title: "Swing Run",
        stack: &["Unity", "C#", "アーケード"],
        thumb: "source/swingrun_thumb.gif",
        url: "https://unityroom.com/games/swing_run",
        desc: "シンプルな操作　ハイスコアを目指せ！",
    },
    ProjectRecord {
        title: "ピクセルダンジョン",
        stack: &["Unity", "C#", "シューティング"],
        thumb: "source/pixeldungeon_thumb.gif",
        url: "https://unityroom.com/games/pixel_dungeon",
        desc: "オリジナル魔法構築シューティング（RUNE CRAFT DUNGEON前作）",
    },
    ProjectRecord {
        title: "胡蝶のゆりかご",
        stack: &["Unity", "C#", "タワーディフェンス"],
        thumb: "source/butterfly4.png",
        url: "#",
        desc: "サークルでのチーム開発ゲーム　防衛TD",
    },
    ProjectRecord {
        title: "Blender作品",
        stack: &["Blender"],
        thumb: "source/blender_thumb.png",
        url: "#",
        desc: "Blenderも一部触れています　ゲーム用のモデル作成等",
    },
    ProjectRecord {
        title: "Chrono Ricochet Classic(WIP)",
        stack: &["Unity", "C#", "シューティング"],
        thumb: "source/chrono2.png",
        url: "#",
        desc: "跳弾を用いて戦うタンクゲーム",
    },
    ProjectRecord {
        title: "Chrono Ricochet3D(WIP)",
        stack: &["UE", "C++", "シューティング"],
        thumb: "source/chrono3.png",
        url: "#",
        desc: "Chrono RicochetのUE版　開発中",
    },
];

// ============================================================================
// NAVIGATION
// ============================================================================

/// Opens URLs outside the application.
pub trait Navigator {
    /// Open `url` in a new browsing context without giving it a handle back
    /// to this one.
    fn open_in_new_context(&mut self, url: &str);
}

/// Where a click on a card landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// On the card's own link (title / wrapped content).
    InnerLink,
    /// Anywhere else on the card.
    Card,
}

// ============================================================================
// CARD BLOCK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardBlock {
    pub record: ProjectRecord,
}

impl CardBlock {
    pub fn new(record: ProjectRecord) -> Self {
        Self { record }
    }

    pub fn is_clickable(&self) -> bool {
        self.record.href().is_some()
    }

    pub fn class_name(&self) -> &'static str {
        if self.is_clickable() { "card clickable" } else { "card" }
    }

    /// Open the card's URL once for a click on `target`. A click on the
    /// inner link is the link's own activation and is not repeated by the
    /// card, so either target navigates exactly once.
    pub fn handle_click(&self, target: ClickTarget, nav: &mut dyn Navigator) {
        let Some(url) = self.record.href() else {
            return;
        };
        debug!("card click on {target:?}: {url}");
        nav.open_in_new_context(url);
    }

    /// `<article>` markup for this card.
    pub fn markup(&self) -> String {
        let r = &self.record;
        let title = escape_html(r.title);

        let thumb = if r.thumb.is_empty() {
            format!(r#"<span style="opacity:.6">{PLACEHOLDER_THUMB}</span>"#)
        } else {
            format!(r#"<img src="{}" alt="{}">"#, escape_html(r.thumb), title)
        };

        let pills = r
            .stack
            .iter()
            .map(|s| format!("<span class='pill'>{}</span>", escape_html(s)))
            .collect::<Vec<_>>()
            .join(" ");

        let inner = format!(
            r#"
      <div class="thumb">
        {thumb}
      </div>
      <div class="body">
        <h3>{title}</h3>
        <div class="stack">{pills}</div>
        <p style="margin:.5rem 0 0; color:var(--muted)">{desc}</p>
      </div>
    "#,
            desc = escape_html(r.desc),
        );

        let content = match r.href() {
            Some(url) => format!(
                r#"<a href="{}" target="_blank" rel="noopener">{inner}</a>"#,
                escape_html(url)
            ),
            None => inner,
        };

        format!(r#"<article class="{}">{content}</article>"#, self.class_name())
    }
}

// ============================================================================
// CARD GRID
// ============================================================================

/// The container cards are appended to.
#[derive(Debug, Default, Clone)]
pub struct CardGrid {
    blocks: Vec<CardBlock>,
}

impl CardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, block: CardBlock) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[CardBlock] {
        &self.blocks
    }

    /// Every card's markup wrapped in the grid element.
    pub fn markup(&self) -> String {
        let mut html = String::from("<div id=\"works-grid\">\n");
        for block in &self.blocks {
            html.push_str(&block.markup());
            html.push('\n');
        }
        html.push_str("</div>\n");
        html
    }

    pub fn export(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.markup())?;
        info!("wrote {} cards to {}", self.blocks.len(), path.display());
        Ok(())
    }
}

/// Append one card per record to `grid`, in order. A missing grid is
/// skipped silently. Returns the number of cards appended.
pub fn render_cards(records: &[ProjectRecord], grid: Option<&mut CardGrid>) -> usize {
    let Some(grid) = grid else {
        return 0;
    };
    for record in records {
        grid.append(CardBlock::new(*record));
    }
    records.len()
}

/// Footer line: `© <year> <owner>`.
pub fn footer_text(year: i32, owner: &str) -> String {
    format!("\u{a9} {year} {owner}")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        opened: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn open_in_new_context(&mut self, url: &str) {
            self.opened.push(url.to_string());
        }
    }

    const LINKED: ProjectRecord = ProjectRecord {
        title: "Hook Adventure",
        stack: &["Unity", "C#"],
        thumb: "source/hook.gif",
        url: "https://unityroom.com/games/hook_adventure",
        desc: "grapple",
    };

    const UNLINKED: ProjectRecord = ProjectRecord {
        title: "Blender",
        stack: &["Blender"],
        thumb: "",
        url: "#",
        desc: "",
    };

    #[test]
    fn grid_keeps_input_order() {
        let mut grid = CardGrid::new();
        assert_eq!(render_cards(WORKS, Some(&mut grid)), WORKS.len());
        assert_eq!(grid.blocks().len(), 11);
        for (block, record) in grid.blocks().iter().zip(WORKS) {
            assert_eq!(block.record.title, record.title);
        }
    }

    #[test]
    fn missing_grid_is_skipped() {
        assert_eq!(render_cards(WORKS, None), 0);
    }

    #[test]
    fn placeholder_urls_are_not_clickable() {
        let clickable: Vec<bool> = WORKS.iter().map(|r| CardBlock::new(*r).is_clickable()).collect();
        assert_eq!(
            clickable,
            vec![true, true, false, true, true, true, true, false, false, false, false]
        );
        let empty = ProjectRecord { url: "", ..LINKED };
        assert!(!CardBlock::new(empty).is_clickable());
    }

    #[test]
    fn clickable_card_opens_once_per_click() {
        let card = CardBlock::new(LINKED);

        let mut nav = RecordingNavigator::default();
        card.handle_click(ClickTarget::Card, &mut nav);
        assert_eq!(nav.opened, vec![LINKED.url.to_string()]);

        let mut nav = RecordingNavigator::default();
        card.handle_click(ClickTarget::InnerLink, &mut nav);
        assert_eq!(nav.opened.len(), 1);
    }

    #[test]
    fn placeholder_card_never_navigates() {
        let card = CardBlock::new(UNLINKED);
        let mut nav = RecordingNavigator::default();
        card.handle_click(ClickTarget::Card, &mut nav);
        card.handle_click(ClickTarget::InnerLink, &mut nav);
        assert!(nav.opened.is_empty());
    }

    #[test]
    fn linked_markup_wraps_content_in_anchor() {
        let html = CardBlock::new(LINKED).markup();
        assert!(html.starts_with(r#"<article class="card clickable"><a href="https://unityroom.com/games/hook_adventure" target="_blank" rel="noopener">"#));
        assert!(html.contains(r#"<img src="source/hook.gif" alt="Hook Adventure">"#));
        assert!(html.contains("<h3>Hook Adventure</h3>"));
        assert!(html.contains("<span class='pill'>Unity</span> <span class='pill'>C#</span>"));
        assert!(html.ends_with("</a></article>"));
    }

    #[test]
    fn unlinked_markup_has_placeholder_thumb_and_no_anchor() {
        let html = CardBlock::new(UNLINKED).markup();
        assert!(html.starts_with(r#"<article class="card">"#));
        assert!(!html.contains("<a "));
        assert!(html.contains("(screenshot later)"));
    }

    #[test]
    fn markup_escapes_text() {
        let record = ProjectRecord { title: "<b>R&D</b>", ..UNLINKED };
        let html = CardBlock::new(record).markup();
        assert!(html.contains("<h3>&lt;b&gt;R&amp;D&lt;/b&gt;</h3>"));
    }

    #[test]
    fn grid_markup_contains_every_card() {
        let mut grid = CardGrid::new();
        render_cards(WORKS, Some(&mut grid));
        let html = grid.markup();
        assert_eq!(html.matches("<article").count(), 11);
        assert_eq!(html.matches("rel=\"noopener\"").count(), 6);
    }

    #[test]
    fn export_writes_markup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.html");
        let mut grid = CardGrid::new();
        render_cards(&WORKS[..2], Some(&mut grid));
        grid.export(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, grid.markup());
    }

    #[test]
    fn footer_shows_year_and_owner() {
        assert_eq!(footer_text(2026, "Orca76"), "\u{a9} 2026 Orca76");
    }
}
