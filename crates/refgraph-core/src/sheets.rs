//! Sheet layer: typed field access on resources
//!
//! Scalar fields live on the node; reference fields live in the graph and are
//! resynchronized through `Transaction::set_references` whenever they are
//! written, so the graph never drifts from what the fields contain.

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::model::{Appstructs, FieldValue, Node, RefType, ResourceKind, Sheet, SheetData};
use crate::transaction::{Content, Transaction};

fn provided_node(content: &Content, oid: Oid, sheet: Sheet) -> Result<&Node> {
    let node = content.node(oid)?;
    if !node.resource_type.provides(sheet) {
        return Err(RefGraphError::SheetNotProvided { oid, sheet });
    }
    Ok(node)
}

/// Read one field of `sheet` on `oid`
///
/// # Errors
///
/// Returns `ResourceNotFound`, `SheetNotProvided` or `UnknownField`.
pub fn read_field(
    content: &Content,
    oid: Oid,
    sheet: Sheet,
    field: &str,
) -> Result<FieldValue> {
    let node = provided_node(content, oid, sheet)?;
    if let Some(reftype) = sheet.reftype_for_field(field) {
        let targets = content.graph.targets(oid, reftype);
        return Ok(if reftype.meta().single_valued {
            FieldValue::Reference(targets.first().copied())
        } else {
            FieldValue::References(targets.to_vec())
        });
    }
    if sheet.has_scalar_field(field) {
        let value = node
            .attributes
            .get(&sheet)
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        return Ok(FieldValue::Value(value));
    }
    Err(RefGraphError::UnknownField {
        sheet,
        field: field.to_string(),
    })
}

/// Every field of `sheet` on `oid`
///
/// # Errors
///
/// Returns `ResourceNotFound` or `SheetNotProvided`.
pub fn get_sheet_data(content: &Content, oid: Oid, sheet: Sheet) -> Result<SheetData> {
    provided_node(content, oid, sheet)?;
    let mut data = SheetData::new();
    for field in sheet.scalar_fields() {
        data.insert(field.to_string(), read_field(content, oid, sheet, field)?);
    }
    for (field, _) in sheet.reference_fields() {
        data.insert(field.to_string(), read_field(content, oid, sheet, field)?);
    }
    Ok(data)
}

/// Check that `value` fits `sheet.field`, including reference targets
fn validate_field(
    content: &Content,
    sheet: Sheet,
    field: &str,
    value: &FieldValue,
) -> Result<()> {
    let invalid = |reason: String| RefGraphError::InvalidFieldValue {
        sheet,
        field: field.to_string(),
        reason,
    };
    match (sheet.reftype_for_field(field), value) {
        (Some(_), FieldValue::Value(_)) => Err(invalid("expected references".to_string())),
        (Some(reftype), value) => {
            let targets = value.targets().unwrap_or_default();
            if reftype.meta().single_valued && targets.len() > 1 {
                return Err(invalid("field holds a single reference".to_string()));
            }
            let target_sheet = reftype.meta().target_sheet;
            for target in targets {
                let node = content
                    .resolve(target)
                    .ok_or_else(|| invalid(format!("target {target} does not exist")))?;
                if !node.resource_type.provides(target_sheet) {
                    return Err(invalid(format!(
                        "target {target} does not provide {target_sheet}"
                    )));
                }
            }
            Ok(())
        }
        (None, FieldValue::Value(_)) if sheet.has_scalar_field(field) => Ok(()),
        (None, FieldValue::Value(_)) => Err(RefGraphError::UnknownField {
            sheet,
            field: field.to_string(),
        }),
        (None, _) if sheet.has_scalar_field(field) => {
            Err(invalid("expected a scalar value".to_string()))
        }
        (None, _) => Err(RefGraphError::UnknownField {
            sheet,
            field: field.to_string(),
        }),
    }
}

/// Reference types whose edges only the version DAG and the tag manager
/// may write
pub fn is_managed_reftype(reftype: RefType) -> bool {
    reftype.is_version_link() || matches!(reftype, RefType::TagElements | RefType::TagsElements)
}

fn managed_field_error(sheet: Sheet, field: &str) -> RefGraphError {
    RefGraphError::InvalidFieldValue {
        sheet,
        field: field.to_string(),
        reason: "maintained by the version history".to_string(),
    }
}

/// Refuse client data that would write `follows` or tag elements
///
/// # Errors
///
/// Returns `InvalidFieldValue` for the first managed field in `data`.
pub fn ensure_unmanaged(sheet: Sheet, data: &SheetData) -> Result<()> {
    let managed = data.keys().find(|field| {
        sheet
            .reftype_for_field(field)
            .is_some_and(is_managed_reftype)
    });
    match managed {
        Some(field) => Err(managed_field_error(sheet, field)),
        None => Ok(()),
    }
}

/// `ensure_unmanaged` over every sheet of `appstructs`
///
/// # Errors
///
/// Returns `InvalidFieldValue` for the first managed field found.
pub fn ensure_unmanaged_appstructs(appstructs: &Appstructs) -> Result<()> {
    appstructs
        .iter()
        .try_for_each(|(sheet, data)| ensure_unmanaged(*sheet, data))
}

/// Check a client write of `reftype` edges out of `source` as if the
/// declaring sheet field were written.
///
/// # Errors
///
/// Returns `Configuration` for a non-concrete reftype, `InvalidFieldValue`
/// for managed reftypes or unfit targets, `SheetNotProvided` if `source`
/// lacks the declaring sheet, and `ImmutableVersion` for committed versions.
pub fn check_reference_write(
    tx: &Transaction<'_>,
    source: Oid,
    reftype: RefType,
    targets: &[Oid],
) -> Result<()> {
    if !reftype.is_concrete() {
        return Err(RefGraphError::Configuration {
            details: format!("{reftype} is not a concrete reference type"),
        });
    }
    let meta = reftype.meta();
    if is_managed_reftype(reftype) {
        return Err(managed_field_error(meta.source_sheet, meta.source_field));
    }
    provided_node(tx.content(), source, meta.source_sheet)?;
    ensure_writable(tx, source)?;
    validate_field(
        tx.content(),
        meta.source_sheet,
        meta.source_field,
        &FieldValue::References(targets.to_vec()),
    )
}

fn ensure_writable(tx: &Transaction<'_>, oid: Oid) -> Result<()> {
    let node = tx.node(oid)?;
    if node.kind() == ResourceKind::ItemVersion && !tx.changelog().was_created(oid) {
        return Err(RefGraphError::ImmutableVersion { oid });
    }
    Ok(())
}

/// Write one field of `sheet` on `oid`
///
/// For reference fields `Reference(None)` clears the field.
///
/// # Errors
///
/// Returns `ImmutableVersion` for versions created in an earlier transaction,
/// plus the lookup and validation errors of the sheet layer.
pub fn write_field(
    tx: &mut Transaction<'_>,
    oid: Oid,
    sheet: Sheet,
    field: &str,
    value: FieldValue,
) -> Result<()> {
    provided_node(tx.content(), oid, sheet)?;
    ensure_writable(tx, oid)?;
    validate_field(tx.content(), sheet, field, &value)?;

    match (sheet.reftype_for_field(field), value) {
        (Some(reftype), value) => {
            let targets = value.targets().unwrap_or_default();
            tx.set_references(oid, &targets, reftype, true)?;
        }
        (None, FieldValue::Value(value)) => {
            tx.node_mut(oid)?
                .attributes
                .entry(sheet)
                .or_default()
                .insert(field.to_string(), value);
        }
        (None, _) => {
            return Err(RefGraphError::Internal {
                reason: format!("unvalidated write to {sheet}.{field}"),
            })
        }
    }
    tx.mark_modified(oid);
    Ok(())
}

/// Write several fields of `sheet` on `oid` at once
///
/// Every field is validated before anything is written. Reference fields go
/// through `set_references_for_isheet`, so `Reference(None)` leaves a field
/// untouched here.
///
/// # Errors
///
/// Same as `write_field`.
pub fn set_sheet_data(
    tx: &mut Transaction<'_>,
    oid: Oid,
    sheet: Sheet,
    data: &SheetData,
) -> Result<()> {
    provided_node(tx.content(), oid, sheet)?;
    ensure_writable(tx, oid)?;
    for (field, value) in data {
        validate_field(tx.content(), sheet, field, value)?;
    }

    let (references, scalars): (SheetData, SheetData) = data
        .iter()
        .map(|(field, value)| (field.clone(), value.clone()))
        .partition(|(field, _)| sheet.reftype_for_field(field).is_some());

    if !scalars.is_empty() {
        let attributes = tx.node_mut(oid)?.attributes.entry(sheet).or_default();
        for (field, value) in scalars {
            if let FieldValue::Value(value) = value {
                attributes.insert(field, value);
            }
        }
    }
    tx.set_references_for_isheet(oid, sheet, &references, true)?;
    tx.mark_modified(oid);
    Ok(())
}
