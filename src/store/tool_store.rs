//! ToolStore implementation on SQLite.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use serde_json::{Map, Value};

use crate::domain::{InstanceLookup, ToolDescriptor, ToolInfo, ToolInstance, ToolInstanceRequest, ToolParam, ToolSource};
use crate::error::{Result, ToolconfError};

/// Current time as stored in `create_time`/`update_time`.
///
/// Fixed-width UTC so that string order is time order.
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// ToolStore keeps scanned tools and agent tool configuration in SQLite.
pub struct ToolStore {
    db: Mutex<Connection>,
}

impl ToolStore {
    /// Open or create a store at the given database path.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ToolconfError::Storage(format!("Failed to create store directory {}: {}", parent.display(), e))
            })?;
        }

        let db = Connection::open(db_path)?;
        Self::init_schema(&db)?;
        log::debug!("Opened tool store at {}", db_path.display());

        Ok(Self { db: Mutex::new(db) })
    }

    /// Open a store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tool_info (
                tool_id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                origin_name TEXT,
                class_name TEXT,
                description TEXT,
                source TEXT NOT NULL,
                usage TEXT NOT NULL DEFAULT '',
                params TEXT NOT NULL DEFAULT '[]',
                inputs TEXT,
                output_type TEXT,
                category TEXT,
                is_available INTEGER NOT NULL DEFAULT 1,
                created_by TEXT,
                updated_by TEXT,
                create_time TEXT NOT NULL,
                update_time TEXT NOT NULL,
                UNIQUE (tenant_id, name, source, usage)
            );

            CREATE INDEX IF NOT EXISTS idx_tool_info_tenant ON tool_info(tenant_id);

            CREATE TABLE IF NOT EXISTS tool_instance (
                tool_instance_id INTEGER PRIMARY KEY AUTOINCREMENT,
                tool_id INTEGER NOT NULL,
                agent_id INTEGER NOT NULL,
                params TEXT NOT NULL DEFAULT '{}',
                enabled INTEGER NOT NULL DEFAULT 0,
                tenant_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                create_time TEXT NOT NULL,
                update_time TEXT NOT NULL,
                UNIQUE (tool_id, agent_id, tenant_id)
            );

            CREATE INDEX IF NOT EXISTS idx_tool_instance_tool ON tool_instance(tool_id, tenant_id);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| ToolconfError::Storage("Store connection lock poisoned".to_string()))
    }

    /// Replace a tenant's tool table with the result of a scan.
    ///
    /// Tools are matched on name, source and usage. Matches are updated,
    /// new tools inserted, and tools missing from `tools` are kept but
    /// marked unavailable. Returns the number of tools written.
    pub fn apply_scan(&self, tenant_id: &str, user_id: &str, tools: &[ToolInfo]) -> Result<usize> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;
        let now = now_timestamp();

        tx.execute("UPDATE tool_info SET is_available = 0 WHERE tenant_id = ?1", params![tenant_id])?;

        for tool in tools {
            let params_json = serde_json::to_string(&tool.params)?;
            let usage = tool.usage.as_deref().unwrap_or("");
            tx.execute(
                r#"
                INSERT INTO tool_info
                (tenant_id, name, origin_name, class_name, description, source, usage, params,
                 inputs, output_type, category, is_available, created_by, updated_by, create_time, update_time)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?12, ?13, ?13)
                ON CONFLICT (tenant_id, name, source, usage) DO UPDATE SET
                    origin_name = excluded.origin_name,
                    class_name = excluded.class_name,
                    description = excluded.description,
                    params = excluded.params,
                    inputs = excluded.inputs,
                    output_type = excluded.output_type,
                    category = excluded.category,
                    is_available = 1,
                    updated_by = excluded.updated_by,
                    update_time = excluded.update_time
                "#,
                params![
                    tenant_id,
                    tool.name,
                    tool.origin_name,
                    tool.class_name,
                    tool.description,
                    tool.source.as_str(),
                    usage,
                    params_json,
                    tool.inputs,
                    tool.output_type,
                    tool.category,
                    user_id,
                    now,
                ],
            )?;
        }

        tx.commit()?;
        log::info!("Stored {} scanned tools for tenant {}", tools.len(), tenant_id);
        Ok(tools.len())
    }

    /// All tools of a tenant, available or not, in insertion order.
    pub fn list_tools(&self, tenant_id: &str) -> Result<Vec<ToolDescriptor>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            r#"
            SELECT tool_id, name, origin_name, description, source, usage, category,
                   inputs, params, is_available, create_time
            FROM tool_info WHERE tenant_id = ?1 ORDER BY tool_id
            "#,
        )?;

        let rows = stmt
            .query_map(params![tenant_id], read_descriptor_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut tool, params_json)| {
                tool.params = parse_params(&params_json)?;
                Ok(tool)
            })
            .collect()
    }

    /// Configuration an agent saved for a tool.
    pub fn search_instance(&self, agent_id: i64, tool_id: i64, tenant_id: &str) -> Result<InstanceLookup> {
        Ok(self
            .get_instance(agent_id, tool_id, tenant_id)?
            .map(InstanceLookup::from)
            .unwrap_or_else(InstanceLookup::missing))
    }

    fn get_instance(&self, agent_id: i64, tool_id: i64, tenant_id: &str) -> Result<Option<ToolInstance>> {
        let db = self.conn()?;
        let result = db.query_row(
            r#"
            SELECT tool_instance_id, tool_id, agent_id, params, enabled, tenant_id, user_id, create_time, update_time
            FROM tool_instance WHERE agent_id = ?1 AND tool_id = ?2 AND tenant_id = ?3
            "#,
            params![agent_id, tool_id, tenant_id],
            read_instance_row,
        );

        match result {
            Ok((instance, params_json)) => Ok(Some(ToolInstance {
                params: parse_object(&params_json)?,
                ..instance
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or update an agent's configuration of a tool.
    pub fn upsert_instance(&self, request: &ToolInstanceRequest, tenant_id: &str, user_id: &str) -> Result<ToolInstance> {
        let params_json = serde_json::to_string(&request.params)?;
        let now = now_timestamp();
        {
            let db = self.conn()?;
            db.execute(
                r#"
                INSERT INTO tool_instance
                (tool_id, agent_id, params, enabled, tenant_id, user_id, create_time, update_time)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                ON CONFLICT (tool_id, agent_id, tenant_id) DO UPDATE SET
                    params = excluded.params,
                    enabled = excluded.enabled,
                    user_id = excluded.user_id,
                    update_time = excluded.update_time
                "#,
                params![
                    request.tool_id,
                    request.agent_id,
                    params_json,
                    request.enabled,
                    tenant_id,
                    user_id,
                    now,
                ],
            )?;
        }
        log::debug!(
            "Saved configuration of tool {} for agent {} (tenant {})",
            request.tool_id,
            request.agent_id,
            tenant_id
        );

        self.get_instance(request.agent_id, request.tool_id, tenant_id)?
            .ok_or_else(|| ToolconfError::Storage("Saved tool instance could not be read back".to_string()))
    }

    /// Most recently saved params for a tool, whichever agent saved them.
    pub fn last_config(&self, tool_id: i64, tenant_id: &str, user_id: &str) -> Result<Map<String, Value>> {
        let db = self.conn()?;
        let result = db.query_row(
            r#"
            SELECT params FROM tool_instance
            WHERE tool_id = ?1 AND tenant_id = ?2 AND user_id = ?3
            ORDER BY update_time DESC, tool_instance_id DESC
            LIMIT 1
            "#,
            params![tool_id, tenant_id, user_id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(params_json) => parse_object(&params_json),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(ToolconfError::ConfigNotFound(tool_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Tenants that own at least one tool.
    pub fn tenant_ids(&self) -> Result<Vec<String>> {
        let db = self.conn()?;
        let mut stmt = db.prepare("SELECT DISTINCT tenant_id FROM tool_info ORDER BY tenant_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

fn read_descriptor_row(row: &Row<'_>) -> rusqlite::Result<(ToolDescriptor, String)> {
    let id: i64 = row.get(0)?;
    let source: String = row.get(4)?;
    let usage: String = row.get(5)?;
    let tool = ToolDescriptor {
        id: id.to_string(),
        name: row.get(1)?,
        origin_name: row.get(2)?,
        description: row.get(3)?,
        source: ToolSource::from(source),
        usage: Some(usage).filter(|u| !u.is_empty()),
        category: row.get(6)?,
        inputs: row.get(7)?,
        params: Vec::new(),
        is_available: row.get(9)?,
        create_time: row.get(10)?,
    };
    Ok((tool, row.get(8)?))
}

fn read_instance_row(row: &Row<'_>) -> rusqlite::Result<(ToolInstance, String)> {
    let instance = ToolInstance {
        tool_instance_id: row.get(0)?,
        tool_id: row.get(1)?,
        agent_id: row.get(2)?,
        params: Map::new(),
        enabled: row.get(4)?,
        tenant_id: row.get(5)?,
        user_id: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    };
    Ok((instance, row.get(3)?))
}

fn parse_params(json: &str) -> Result<Vec<ToolParam>> {
    Ok(serde_json::from_str(json)?)
}

fn parse_object(json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(json)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ToolconfError::Storage(format!("Stored params are not an object: {}", other))),
    }
}
