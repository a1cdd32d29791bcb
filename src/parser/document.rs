//! Document Model Resolver
//!
//! Walks the object table for document-level structure: the catalog, the
//! AcroForm field tree, and the page content streams. Structural absence
//! (no catalog, no form, no pages) means "nothing to extract", never an
//! error. All reference walks are cycle-guarded with visited sets keyed by
//! object id.

use std::collections::HashSet;

use super::objects::{PdfDictionary, PdfObject};
use super::table::{ObjectId, ObjectTable};
use crate::forms::{FieldType, FormField};

/// Resolver over a built object table
pub struct DocumentResolver<'a> {
    table: &'a ObjectTable,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(table: &'a ObjectTable) -> Self {
        Self { table }
    }

    /// Find the document catalog: the first entry (in id order) whose
    /// dictionary has /Type /Catalog
    pub fn find_catalog(&self) -> Option<&'a PdfDictionary> {
        self.table
            .iter()
            .filter_map(|(_, entry)| entry.dict())
            .find(|dict| dict.get_type() == Some("Catalog"))
    }

    /// Follow reference chains until a direct object is reached.
    /// A dangling or circular chain resolves to None.
    pub fn resolve(&self, object: &'a PdfObject) -> Option<&'a PdfObject> {
        let mut current = object;
        let mut seen: HashSet<ObjectId> = HashSet::new();
        while let PdfObject::Reference(number, generation) = current {
            let id = ObjectId::new(*number, *generation);
            if !seen.insert(id) {
                tracing::warn!(object = %id, "circular reference chain");
                return None;
            }
            current = self.table.object(id)?;
        }
        Some(current)
    }

    fn resolve_dict(&self, object: &'a PdfObject) -> Option<&'a PdfDictionary> {
        self.resolve(object).and_then(|obj| obj.as_dict())
    }

    /// Collect the interactive-form fields reachable from the catalog.
    ///
    /// Field names use each node's own /T only; fully-qualified
    /// `parent.child` names are deliberately not built.
    pub fn acroform_fields(&self) -> Vec<FormField> {
        let Some(catalog) = self.find_catalog() else {
            return Vec::new();
        };
        let Some(acroform) = catalog.get("AcroForm").and_then(|o| self.resolve_dict(o)) else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        let mut visited: HashSet<ObjectId> = HashSet::new();

        if let Some(list) = acroform
            .get("Fields")
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_array())
        {
            for node in list.iter() {
                self.walk_field(node, &mut visited, &mut fields);
            }
        }

        fields
    }

    fn walk_field(
        &self,
        node: &'a PdfObject,
        visited: &mut HashSet<ObjectId>,
        fields: &mut Vec<FormField>,
    ) {
        let dict = match node {
            PdfObject::Reference(number, generation) => {
                let id = ObjectId::new(*number, *generation);
                if !visited.insert(id) {
                    return;
                }
                match self.table.dict(id) {
                    Some(dict) => dict,
                    None => return,
                }
            }
            PdfObject::Dictionary(dict) => dict,
            _ => return,
        };

        let name = dict
            .get("T")
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_string())
            .map(|s| s.decode())
            .unwrap_or_default();

        let field_type = dict
            .get("FT")
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_name())
            .map(|n| FieldType::from_pdf_name(n.as_str()))
            .unwrap_or(FieldType::Unknown);

        let value = dict
            .get("V")
            .and_then(|o| self.resolve(o))
            .and_then(value_text)
            .or_else(|| {
                // Checkbox/radio current state when no /V was written
                dict.get("AS")
                    .and_then(|o| self.resolve(o))
                    .and_then(value_text)
            });

        if !name.is_empty() {
            fields.push(FormField {
                name,
                field_type,
                value,
            });
        }

        if let Some(kids) = dict
            .get("Kids")
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_array())
        {
            for kid in kids.iter() {
                self.walk_field(kid, visited, fields);
            }
        }
    }

    /// Ids of the streams to feed the text extractor, in reading order.
    ///
    /// Walks Catalog -> /Pages -> /Kids collecting each page's /Contents;
    /// when no page tree resolves, falls back to every stream that is not
    /// obviously something else (images, fonts, metadata), in id order.
    pub fn content_stream_ids(&self) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        let mut visited: HashSet<ObjectId> = HashSet::new();

        if let Some(catalog) = self.find_catalog() {
            if let Some(pages) = catalog.get("Pages") {
                self.walk_page_node(pages, &mut visited, &mut ids);
            }
        }

        if ids.is_empty() {
            for (id, entry) in self.table.iter() {
                if entry.stream.is_none() || entry.dict().is_some_and(is_non_content_dict) {
                    continue;
                }
                ids.push(id);
            }
        }

        ids
    }

    fn walk_page_node(
        &self,
        node: &'a PdfObject,
        visited: &mut HashSet<ObjectId>,
        ids: &mut Vec<ObjectId>,
    ) {
        let dict = match node {
            PdfObject::Reference(number, generation) => {
                let id = ObjectId::new(*number, *generation);
                if !visited.insert(id) {
                    return;
                }
                match self.table.dict(id) {
                    Some(dict) => dict,
                    None => return,
                }
            }
            PdfObject::Dictionary(dict) => dict,
            _ => return,
        };

        match dict.get_type() {
            Some("Pages") => {
                if let Some(kids) = dict
                    .get("Kids")
                    .and_then(|o| self.resolve(o))
                    .and_then(|o| o.as_array())
                {
                    for kid in kids.iter() {
                        self.walk_page_node(kid, visited, ids);
                    }
                }
            }
            Some("Page") => {
                match dict.get("Contents") {
                    Some(PdfObject::Reference(number, generation)) => {
                        self.push_content_id(ObjectId::new(*number, *generation), ids);
                    }
                    Some(PdfObject::Array(array)) => {
                        for element in array.iter() {
                            if let PdfObject::Reference(number, generation) = element {
                                self.push_content_id(ObjectId::new(*number, *generation), ids);
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn push_content_id(&self, id: ObjectId, ids: &mut Vec<ObjectId>) {
        let has_stream = self
            .table
            .entry(id)
            .is_some_and(|entry| entry.stream.is_some());
        if has_stream && !ids.contains(&id) {
            ids.push(id);
        }
    }
}

/// Stream dictionaries that are recognizably not page content
fn is_non_content_dict(dict: &PdfDictionary) -> bool {
    if let Some(subtype) = dict.get("Subtype").and_then(|o| o.as_name()) {
        if matches!(subtype.as_str(), "Image" | "XML") {
            return true;
        }
    }
    matches!(
        dict.get_type(),
        Some("Font") | Some("FontDescriptor") | Some("Metadata") | Some("XRef") | Some("ObjStm")
    )
}

fn value_text(object: &PdfObject) -> Option<String> {
    match object {
        PdfObject::String(s) => Some(s.decode()),
        PdfObject::Name(n) => Some(format!("/{}", n.as_str())),
        PdfObject::Integer(i) => Some(i.to_string()),
        PdfObject::Real(r) => Some(r.to_string()),
        PdfObject::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::filters::Inflater;

    fn table_from(doc: &[u8]) -> ObjectTable {
        let (table, _) = ObjectTable::build(doc, &Inflater::default());
        table
    }

    #[test]
    fn test_find_catalog() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Pages >>\nendobj\n\
              2 0 obj\n<< /Type /Catalog /Pages 1 0 R >>\nendobj\n",
        );
        let resolver = DocumentResolver::new(&table);
        let catalog = resolver.find_catalog().unwrap();
        assert_eq!(catalog.get("Pages").unwrap().as_reference(), Some((1, 0)));
    }

    #[test]
    fn test_no_catalog_yields_no_fields() {
        let table = table_from(b"1 0 obj\n<< /Type /Pages >>\nendobj\n");
        let resolver = DocumentResolver::new(&table);
        assert!(resolver.find_catalog().is_none());
        assert!(resolver.acroform_fields().is_empty());
    }

    #[test]
    fn test_text_field_extraction() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
              2 0 obj\n<< /T (name) /FT /Tx /V (Alice) >>\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[0].value.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_checkbox_falls_back_to_appearance_state() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
              2 0 obj\n<< /T (agree) /FT /Btn /AS /Yes >>\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Button);
        assert_eq!(fields[0].value.as_deref(), Some("/Yes"));
    }

    #[test]
    fn test_indirect_fields_array_and_value() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm 2 0 R >>\nendobj\n\
              2 0 obj\n<< /Fields 3 0 R >>\nendobj\n\
              3 0 obj\n[4 0 R]\nendobj\n\
              4 0 obj\n<< /T (city) /FT /Tx /V 5 0 R >>\nendobj\n\
              5 0 obj\n(Paris)\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "city");
        assert_eq!(fields[0].value.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_nameless_parent_with_kids() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
              2 0 obj\n<< /Kids [3 0 R << /T (inline) /FT /Ch >>] >>\nendobj\n\
              3 0 obj\n<< /T (child) /FT /Tx >>\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["child", "inline"]);
    }

    #[test]
    fn test_cyclic_kids_terminate_without_duplicates() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
              2 0 obj\n<< /T (a) /Kids [3 0 R] >>\nendobj\n\
              3 0 obj\n<< /T (b) /Kids [2 0 R] >>\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_circular_reference_chain_resolves_to_none() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
              2 0 obj\n<< /T (loop) /FT /Tx /V 3 0 R >>\nendobj\n\
              3 0 obj\n4 0 R\nendobj\n\
              4 0 obj\n3 0 R\nendobj\n",
        );
        let fields = DocumentResolver::new(&table).acroform_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, None);
    }

    #[test]
    fn test_content_ids_via_page_tree() {
        let table = table_from(
            b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
              2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n\
              3 0 obj\n<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>\nendobj\n\
              4 0 obj\n<< /Length 2 >>\nstream\nBT\nendstream\nendobj\n\
              5 0 obj\n<< /Subtype /Image >>\nstream\nxx\nendstream\nendobj\n",
        );
        let ids = DocumentResolver::new(&table).content_stream_ids();
        assert_eq!(ids, vec![ObjectId::new(4, 0)]);
    }

    #[test]
    fn test_content_ids_fallback_without_page_tree() {
        let table = table_from(
            b"4 0 obj\n<< /Length 2 >>\nstream\nBT\nendstream\nendobj\n\
              5 0 obj\n<< /Subtype /Image >>\nstream\nxx\nendstream\nendobj\n",
        );
        let ids = DocumentResolver::new(&table).content_stream_ids();
        assert_eq!(ids, vec![ObjectId::new(4, 0)]);
    }
}
