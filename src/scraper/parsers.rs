use super::ScrapeError;
use super::cleaner::{is_digits, parse_count, parse_score};
use crate::models::{RowKind, TopicEntry};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {:?}", css, e)))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Page → container ──────────────────────────────────────────────────────────

/// Outer HTML of the first element matching `css`, if any.
pub fn extract_container(html: &str, css: &str) -> Result<Option<String>, ScrapeError> {
    let doc = Html::parse_document(html);
    let sel = selector(css)?;
    Ok(doc.select(&sel).next().map(|el| el.html()))
}

// ── Container → entries ───────────────────────────────────────────────────────

struct RowSelectors {
    tbody: Selector,
    tr: Selector,
    rank_cell: Selector,
    pinned_icon: Selector,
    title: Selector,
    score: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            tbody: selector("tbody")?,
            tr: selector("tr")?,
            rank_cell: selector(".td-01")?,
            pinned_icon: selector(".td-01 i.icon-top")?,
            title: selector(".td-02 a")?,
            score: selector(".td-02 span")?,
        })
    }
}

/// Parse the trending table into entries, in row order.
///
/// Rows whose rank cell is neither numeric nor pinned are dropped. Any other
/// row missing its title or score is a fault for the whole table.
pub fn parse_hot_table(fragment: &str) -> Result<Vec<TopicEntry>, ScrapeError> {
    let doc = Html::parse_fragment(fragment);
    let sels = RowSelectors::new()?;

    let tbody = doc
        .select(&sels.tbody)
        .next()
        .ok_or_else(|| ScrapeError::ContainerNotFound {
            selector: "tbody".to_string(),
        })?;

    let mut entries = Vec::new();

    for (i, tr) in tbody.select(&sels.tr).enumerate() {
        let row = i + 1;

        let entry = match classify_row(tr, &sels, row)? {
            RowKind::Skipped => {
                debug!("row {}: no numeric rank, skipped", row);
                continue;
            }
            RowKind::Pinned => TopicEntry::pinned(row_topic(tr, &sels, row)?),
            RowKind::Ranked(rank) => {
                let topic = row_topic(tr, &sels, row)?;
                let score_text = tr
                    .select(&sels.score)
                    .next()
                    .map(text_of)
                    .ok_or(ScrapeError::MissingElement {
                        row,
                        element: "score",
                    })?;
                let (tag, score) = parse_score(row, &score_text)?;
                TopicEntry {
                    rank,
                    topic,
                    score,
                    tag,
                }
            }
        };

        entries.push(entry);
    }

    Ok(entries)
}

fn row_topic(tr: ElementRef<'_>, sels: &RowSelectors, row: usize) -> Result<String, ScrapeError> {
    tr.select(&sels.title)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::MissingElement {
            row,
            element: "title link",
        })
}

fn classify_row(tr: ElementRef<'_>, sels: &RowSelectors, row: usize) -> Result<RowKind, ScrapeError> {
    if tr.select(&sels.pinned_icon).next().is_some() {
        return Ok(RowKind::Pinned);
    }

    let rank_text = tr
        .select(&sels.rank_cell)
        .next()
        .map(text_of)
        .ok_or(ScrapeError::MissingElement {
            row,
            element: "rank cell",
        })?;

    if is_digits(&rank_text) {
        Ok(RowKind::Ranked(parse_count(row, &rank_text)?))
    } else {
        Ok(RowKind::Skipped)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod fixtures {
    /// Full page: one pinned row, one ad row without rank, two ranked rows.
    pub const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>微博热搜</title></head><body>
<div id="pl_top_realtimehot">
  <table>
    <thead><tr><th class="th-01">序号</th><th class="th-02">关键词</th></tr></thead>
    <tbody>
      <tr>
        <td class="td-01"><i class="icon-top"></i></td>
        <td class="td-02"><a href="/weibo?q=a">置顶话题</a></td>
      </tr>
      <tr>
        <td class="td-01 ranktop">1</td>
        <td class="td-02"><a href="/weibo?q=b"> 第一条 </a> <span>1234567</span></td>
      </tr>
      <tr>
        <td class="td-01">•</td>
        <td class="td-02"><a href="/weibo?q=ad">推广</a></td>
      </tr>
      <tr>
        <td class="td-01 ranktop">2</td>
        <td class="td-02"><a href="/weibo?q=c">第二条</a> <span>剧集 804321</span></td>
      </tr>
    </tbody>
  </table>
</div>
</body></html>"#;

    pub fn table(rows: &str) -> String {
        format!(
            r#"<div id="pl_top_realtimehot"><table><tbody>{}</tbody></table></div>"#,
            rows
        )
    }

    pub fn ranked_row(rank: &str, topic: &str, score: &str) -> String {
        format!(
            r#"<tr><td class="td-01">{}</td><td class="td-02"><a href="/weibo">{}</a> <span>{}</span></td></tr>"#,
            rank, topic, score
        )
    }
}
