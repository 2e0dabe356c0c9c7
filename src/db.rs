use std::path::Path;

use rusqlite::Connection;

use crate::error::{PipelineError, Result};
use crate::extract::index::LanguageLink;
use crate::extract::PageInput;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            name       TEXT,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id         INTEGER PRIMARY KEY,
            page_id    INTEGER NOT NULL REFERENCES pages(id),
            url        TEXT NOT NULL,
            html       TEXT,
            status     INTEGER,
            error      TEXT,
            latency_ms INTEGER,
            fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_page ON page_data(page_id);
        ",
    )?;
    Ok(())
}

// ── Index ──

pub fn insert_links(conn: &Connection, links: &[LanguageLink]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url, name) VALUES (?1, ?2)")?;
        for link in links {
            count += stmt.execute(rusqlite::params![link.url, link.name])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub struct PendingPage {
    pub id: i64,
    pub name: Option<String>,
    pub url: String,
}

pub fn fetch_unvisited(conn: &Connection, limit: Option<usize>) -> Result<Vec<PendingPage>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT id, name, url FROM pages WHERE visited = 0 ORDER BY id LIMIT {}",
            n
        ),
        None => "SELECT id, name, url FROM pages WHERE visited = 0 ORDER BY id".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PendingPage {
                id: row.get(0)?,
                name: row.get(1)?,
                url: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Fetching ──

pub struct FetchRow {
    pub page_id: i64,
    pub url: String,
    pub html: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub latency_ms: Option<i64>,
}

/// Record one fetch result and mark its page visited.
pub fn save_fetch(conn: &Connection, row: &FetchRow) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO page_data (page_id, url, html, status, error, latency_ms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![row.page_id, row.url, row.html, row.status, row.error, row.latency_ms],
    )?;
    tx.execute(
        "UPDATE pages SET visited = 1, visited_at = datetime('now') WHERE id = ?1",
        rusqlite::params![row.page_id],
    )?;
    tx.commit()?;
    Ok(())
}

// ── Extraction ──

/// Latest successful fetch of every page, in index order.
pub fn fetch_pages(conn: &Connection, limit: Option<usize>) -> Result<Vec<PageInput>> {
    let sql = format!(
        "SELECT p.name, p.url, pd.html
         FROM pages p
         JOIN page_data pd ON pd.id = (
             SELECT MAX(id) FROM page_data WHERE page_id = p.id AND html IS NOT NULL
         )
         ORDER BY p.id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PageInput {
                name: row.get(0)?,
                url: row.get(1)?,
                html: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub fetched: usize,
    pub errors: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let visited: usize =
        conn.query_row("SELECT COUNT(*) FROM pages WHERE visited = 1", [], |r| r.get(0))?;
    let fetched: usize = conn.query_row(
        "SELECT COUNT(DISTINCT page_id) FROM page_data WHERE html IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let errors: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        visited,
        unvisited: total - visited,
        fetched,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn link(name: Option<&str>, url: &str) -> LanguageLink {
        LanguageLink {
            name: name.map(str::to_string),
            url: url.to_string(),
        }
    }

    #[test]
    fn links_are_inserted_once() {
        let conn = store();
        let links = vec![
            link(Some("Brainfuck"), "https://esolangs.org/wiki/Brainfuck"),
            link(None, "https://esolangs.org/wiki/Untitled"),
        ];
        assert_eq!(insert_links(&conn, &links).unwrap(), 2);
        assert_eq!(insert_links(&conn, &links).unwrap(), 0);

        let pending = fetch_unvisited(&conn, None).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].name.as_deref(), Some("Brainfuck"));
        assert_eq!(pending[1].name, None);
        assert_eq!(fetch_unvisited(&conn, Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn fetch_results_feed_extraction() {
        let conn = store();
        insert_links(
            &conn,
            &[
                link(Some("A"), "https://esolangs.org/wiki/A"),
                link(Some("B"), "https://esolangs.org/wiki/B"),
            ],
        )
        .unwrap();
        let pending = fetch_unvisited(&conn, None).unwrap();

        save_fetch(
            &conn,
            &FetchRow {
                page_id: pending[0].id,
                url: pending[0].url.clone(),
                html: Some("<p>A</p>".into()),
                status: Some(200),
                error: None,
                latency_ms: Some(12),
            },
        )
        .unwrap();
        save_fetch(
            &conn,
            &FetchRow {
                page_id: pending[1].id,
                url: pending[1].url.clone(),
                html: None,
                status: Some(503),
                error: Some("HTTP 503".into()),
                latency_ms: Some(40),
            },
        )
        .unwrap();

        let pages = fetch_pages(&conn, None).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name.as_deref(), Some("A"));
        assert_eq!(pages[0].html, "<p>A</p>");

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.visited, 2);
        assert_eq!(stats.unvisited, 0);
        assert_eq!(stats.fetched, 1);
        assert_eq!(stats.errors, 1);
        assert!(fetch_unvisited(&conn, None).unwrap().is_empty());
    }

    #[test]
    fn connect_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.sqlite");
        let conn = connect(&path).unwrap();
        init_schema(&conn).unwrap();
        assert!(path.exists());
    }
}
