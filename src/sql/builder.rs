//! Builds the parameterized read queries of the catalog API.

use crate::sql::PgBindValue;
use crate::store::{ABILITY_TABLE, ENTITY_TABLE, STATS_TABLE, SYNC_TABLE, TYPE_TABLE};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

const MAIN_ALIAS: &str = "p";
const TYPE_ALIAS: &str = "t";
const ENTITY_COLUMNS: [&str; 9] = [
    "id",
    "pokedex_id",
    "name",
    "height",
    "weight",
    "sprite_url",
    "animated_front",
    "animated_back",
    "created_at",
];

/// Sortable columns. Anything else requested falls back to `PokedexId`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    PokedexId,
    Name,
    Height,
    Weight,
    CreatedAt,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pokedex_id") | Some("id") => SortField::PokedexId,
            Some("name") => SortField::Name,
            Some("height") => SortField::Height,
            Some("weight") => SortField::Weight,
            Some("created_at") => SortField::CreatedAt,
            _ => SortField::PokedexId,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::PokedexId => "pokedex_id",
            SortField::Name => "name",
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sanitized list request. Only constructible through `sanitize`, so every field is in range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    limit: i64,
    offset: i64,
    sort: SortField,
    order: SortOrder,
    type_filter: Option<String>,
}

impl ListQuery {
    /// Limit: default 20 when absent, non-positive or above 100. Offset: default 0 when absent or negative.
    /// Unknown sort fields and orders fall back to pokedex id ascending. Type filter is trimmed and
    /// lowercased; blank means no filter.
    pub fn sanitize(
        limit: Option<i64>,
        offset: Option<i64>,
        sort: Option<&str>,
        order: Option<&str>,
        type_filter: Option<&str>,
    ) -> Self {
        let limit = match limit {
            Some(n) if n > 0 && n <= MAX_LIMIT => n,
            _ => DEFAULT_LIMIT,
        };
        let offset = offset.filter(|n| *n >= 0).unwrap_or(0);
        let type_filter = type_filter
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        ListQuery {
            limit,
            offset,
            sort: SortField::parse(sort),
            order: SortOrder::parse(order),
            type_filter,
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn type_filter(&self) -> Option<&str> {
        self.type_filter.as_deref()
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::sanitize(None, None, None, None, None)
    }
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn qualified(alias: &str, column: &str) -> String {
    format!("{}.{}", alias, column)
}

fn entity_column_list(alias: &str) -> String {
    ENTITY_COLUMNS
        .iter()
        .map(|c| qualified(alias, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// FROM/JOIN/WHERE shared by the page and count queries. Pushes the filter param when present.
fn from_clause(q: &mut QueryBuf, query: &ListQuery) -> String {
    match query.type_filter() {
        Some(type_name) => {
            let n = q.push_param(PgBindValue::Text(type_name.to_string()));
            format!(
                "{} {} JOIN {} {} ON {} = {} WHERE {} = ${}",
                ENTITY_TABLE,
                MAIN_ALIAS,
                TYPE_TABLE,
                TYPE_ALIAS,
                qualified(TYPE_ALIAS, "pokemon_id"),
                qualified(MAIN_ALIAS, "id"),
                qualified(TYPE_ALIAS, "type_name"),
                n
            )
        }
        None => format!("{} {}", ENTITY_TABLE, MAIN_ALIAS),
    }
}

/// One page of entity rows. With a type filter the join can match an entity once per slot,
/// so rows are de-duplicated. Non-unique sort keys get pokedex id as a tiebreaker.
pub fn select_page(query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let distinct = if query.type_filter().is_some() { "DISTINCT " } else { "" };
    let from = from_clause(&mut q, query);
    let mut order = format!("{} {}", qualified(MAIN_ALIAS, query.sort().column()), query.order().keyword());
    if query.sort() != SortField::PokedexId {
        order.push_str(&format!(", {} ASC", qualified(MAIN_ALIAS, "pokedex_id")));
    }
    let limit_n = q.push_param(PgBindValue::I64(query.limit()));
    let offset_n = q.push_param(PgBindValue::I64(query.offset()));
    q.sql = format!(
        "SELECT {}{} FROM {} ORDER BY {} LIMIT ${} OFFSET ${}",
        distinct,
        entity_column_list(MAIN_ALIAS),
        from,
        order,
        limit_n,
        offset_n
    );
    q
}

/// Total rows matching the filter, counting each entity once.
pub fn count_matching(query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let from = from_clause(&mut q, query);
    let count = if query.type_filter().is_some() {
        format!("COUNT(DISTINCT {})", qualified(MAIN_ALIAS, "id"))
    } else {
        "COUNT(*)".to_string()
    };
    q.sql = format!("SELECT {} FROM {}", count, from);
    q
}

/// Entity row by external (pokedex) id.
pub fn select_by_pokedex_id(pokedex_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I32(pokedex_id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE pokedex_id = ${}",
        ENTITY_COLUMNS.join(", "),
        ENTITY_TABLE,
        n
    );
    q
}

/// Type rows for one entity (internal id), slot-ordered.
pub fn select_types(entity_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I32(entity_id));
    q.sql = format!(
        "SELECT type_name, slot FROM {} WHERE pokemon_id = ${} ORDER BY slot",
        TYPE_TABLE, n
    );
    q
}

/// Ability rows for one entity (internal id), slot-ordered.
pub fn select_abilities(entity_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I32(entity_id));
    q.sql = format!(
        "SELECT ability_name, is_hidden, slot FROM {} WHERE pokemon_id = ${} ORDER BY slot",
        ABILITY_TABLE, n
    );
    q
}

/// The stats row for one entity (internal id), if any.
pub fn select_stats(entity_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I32(entity_id));
    q.sql = format!(
        "SELECT hp, attack, defense, special_attack, special_defense, speed FROM {} WHERE pokemon_id = ${}",
        STATS_TABLE, n
    );
    q
}

/// Provenance record for one sync category.
pub fn select_sync_status(category: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Text(category.to_string()));
    q.sql = format!(
        "SELECT sync_type, last_sync_at, total_synced, status FROM {} WHERE sync_type = ${}",
        SYNC_TABLE, n
    );
    q
}
