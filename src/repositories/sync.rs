//! Child-collection replacement shared by the nested repositories.
//!
//! A child list on an update request has three states: absent (`None`) leaves
//! the stored rows untouched, `Some(&[])` deletes them all, and a populated
//! slice deletes them all and inserts the given rows. Both steps run on the
//! caller's transaction, so a failed insert rolls back the delete too.

use rusqlite::{Connection, Transaction};

use crate::error::{AppError, Result};

/// A child table and the column pointing at its parent.
#[derive(Debug, Clone, Copy)]
pub struct ChildRelation {
    pub table: &'static str,
    pub parent_column: &'static str,
}

pub const TEMPLATE_EXERCISES: ChildRelation = ChildRelation {
    table: "template_exercises",
    parent_column: "workout_template_id",
};

pub const SESSION_EXERCISES: ChildRelation = ChildRelation {
    table: "session_exercises",
    parent_column: "workout_session_id",
};

pub const EXERCISE_SETS: ChildRelation = ChildRelation {
    table: "exercise_sets",
    parent_column: "session_exercise_id",
};

pub const EXERCISE_MUSCLE_GROUPS: ChildRelation = ChildRelation {
    table: "exercise_muscle_groups",
    parent_column: "exercise_id",
};

/// Apply a three-state child update. Returns whether anything was replaced.
///
/// Rows of nested relations are removed by `ON DELETE CASCADE`, so replacing
/// session exercises also drops their sets; `insert` is responsible for
/// writing any grandchildren of the fresh rows.
pub fn replace_children<T, F>(
    tx: &Transaction<'_>,
    relation: ChildRelation,
    parent_id: &str,
    children: Option<&[T]>,
    mut insert: F,
) -> Result<bool>
where
    F: FnMut(&Transaction<'_>, &T) -> Result<()>,
{
    let Some(children) = children else {
        return Ok(false);
    };

    let removed = tx.execute(
        &format!(
            "DELETE FROM {} WHERE {} = ?",
            relation.table, relation.parent_column
        ),
        [parent_id],
    )?;

    for child in children {
        insert(tx, child)?;
    }

    tracing::debug!(
        "Replaced {} {} rows of {} with {}",
        removed,
        relation.table,
        parent_id,
        children.len()
    );

    Ok(true)
}

/// Fail with an integrity error unless `id` exists in `table` for `user_id`.
///
/// Used for references carried in request bodies, where another user's id
/// must fail the write rather than read as "not found".
pub fn require_owned(
    conn: &Connection,
    table: &'static str,
    id: &str,
    user_id: &str,
    label: &str,
) -> Result<()> {
    let owned: bool = conn.query_row(
        &format!(
            "SELECT COUNT(*) > 0 FROM {} WHERE id = ? AND user_id = ?",
            table
        ),
        [id, user_id],
        |row| row.get(0),
    )?;

    if owned {
        Ok(())
    } else {
        Err(AppError::Integrity(format!("{} {} does not exist", label, id)))
    }
}
