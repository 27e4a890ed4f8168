//! Constants used throughout the warehouse library.
//!
//! Names and user-facing messages that are part of the wire contract live
//! here so handlers, the CLI and tests agree on them.

/// Prefix of generated aisle names: aisle `i` is named `"Corredor {i}"`.
pub const RUNNER_NAME_PREFIX: &str = "Corredor";

/// Maximum length of a map name, in characters (`mapas.nome VARCHAR(100)`).
pub const MAX_MAP_NAME_LEN: usize = 100;

/// Largest `numberRunners` accepted when creating a map.
pub const MAX_RUNNERS: u32 = 1000;

/// Maximum length of shelf and location codes (`VARCHAR(50)`).
pub const MAX_CODE_LEN: usize = 50;

/// Aisle rows inserted per statement when creating a map.
///
/// Keeps the number of bound parameters well under SQLite's limit.
pub const AISLE_INSERT_BATCH: u32 = 500;

/// Banner served at `GET /`.
pub const SERVICE_BANNER: &str = "API do Mapeamento de Galpão está no ar!";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3333;

/// Response message for a created map.
pub const MSG_MAP_CREATED: &str = "Mapa criado com sucesso!";

/// Response message for a deleted map.
pub const MSG_MAP_DELETED: &str = "Mapa deletado com sucesso!";

/// Response message when a search matches nothing.
pub const MSG_NO_MATCHES: &str = "Nenhum mapa encontrado para o termo pesquisado.";
