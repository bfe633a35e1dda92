//! Relational tables: a schema, packed row storage and a primary-key index.
//!
//! A [`Table`] validates inserted tuples against its schema, packs them
//! through the byte [`codec`] into an append-only [`RecordList`] and maps
//! the primary key to the row position in a pluggable index — the ordered
//! B+Tree or the extendible hash, selected by [`TableOptions`]. Scans
//! unpack rows on the way out; the equality-based operators (`union`,
//! `minus`, the keyed join) go through the index instead of scanning.
//!
//! [`Table`]: struct.Table.html
//! [`codec`]: codec/index.html
//! [`RecordList`]: trait.RecordList.html
//! [`TableOptions`]: struct.TableOptions.html

use crate::{
    codec,
    expr::Predicate,
    indexes::{BPlusTree, Entries, ExtHashMap, Keys},
    options::{IndexKind, TableOptions},
    records::{MemoryRecords, RecordList},
    schema::{Attribute, KeyValue, Schema, Tuple},
    Error, Result,
};

/// The index maintained over a table's primary key, behind the narrow
/// get/put/entries interface both kinds share.
#[derive(Debug)]
enum PrimaryIndex {
    Ordered(BPlusTree<KeyValue, usize>),
    Hashed(ExtHashMap<KeyValue, usize>),
}

impl PrimaryIndex {
    fn new(options: &TableOptions) -> Self {
        match options.index {
            IndexKind::BTree => PrimaryIndex::Ordered(BPlusTree::new()),
            IndexKind::ExtHash => {
                PrimaryIndex::Hashed(ExtHashMap::new(options.hash_directory_size))
            }
        }
    }

    fn get(&self, key: &KeyValue) -> Option<usize> {
        match self {
            PrimaryIndex::Ordered(tree) => tree.get(key).copied(),
            PrimaryIndex::Hashed(map) => map.get(key).copied(),
        }
    }

    fn put(&mut self, key: KeyValue, row: usize) {
        match self {
            PrimaryIndex::Ordered(tree) => tree.put(key, row),
            PrimaryIndex::Hashed(map) => map.put(key, row),
        }
    }

    fn entries(&self) -> Entries<KeyValue, usize> {
        match self {
            PrimaryIndex::Ordered(tree) => tree.entries(),
            PrimaryIndex::Hashed(map) => map.entries(),
        }
    }
}

/// A relation: named, schema-typed, with record-at-a-time byte storage and
/// a primary-key index.
///
/// The storage backend is pluggable through [`RecordList`] and defaults to
/// the in-memory [`MemoryRecords`]. Inserting a tuple whose primary key is
/// already present redirects the index to the new row — the B+Tree warns on
/// the logging facade — while the superseded row stays in the append-only
/// record list and remains visible to full scans.
///
/// [`RecordList`]: trait.RecordList.html
/// [`MemoryRecords`]: struct.MemoryRecords.html
#[derive(Debug)]
pub struct Table<R: RecordList = MemoryRecords> {
    name: String,
    schema: Schema,
    records: R,
    index: PrimaryIndex,
    options: TableOptions,
}

impl Table<MemoryRecords> {
    /// Creates an empty table with default [`TableOptions`] (a B+Tree
    /// primary index).
    ///
    /// [`TableOptions`]: struct.TableOptions.html
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self::with_options(name, schema, TableOptions::default())
    }

    /// Creates an empty table with explicit options.
    pub fn with_options(name: impl Into<String>, schema: Schema, options: TableOptions) -> Self {
        Self {
            name: name.into(),
            schema,
            records: MemoryRecords::new(),
            index: PrimaryIndex::new(&options),
            options,
        }
    }
}

impl<R: RecordList> Table<R> {
    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the number of stored rows, counting rows superseded by
    /// duplicate-key inserts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates a tuple against the schema, packs it into the record list
    /// and registers its primary key in the index.
    pub fn insert(&mut self, tuple: Tuple) -> Result<()> {
        self.schema.check(&tuple)?;
        let key = self.schema.key_of(&tuple);
        let row = self.records.len();
        self.records.append(codec::pack_tuple(&self.schema, &tuple));
        self.index.put(key, row);
        Ok(())
    }

    /// Returns the tuple stored under `key`, going through the index.
    pub fn get(&self, key: &KeyValue) -> Result<Option<Tuple>> {
        match self.index.get(key).and_then(|row| self.records.get(row)) {
            Some(bytes) => Ok(Some(codec::unpack_tuple(&self.schema, bytes)?)),
            None => Ok(None),
        }
    }

    /// Returns `true` when a tuple is stored under `key`.
    pub fn contains_key(&self, key: &KeyValue) -> bool {
        self.index.get(key).is_some()
    }

    /// Returns the primary keys currently registered in the index.
    pub fn keys(&self) -> Keys<KeyValue> {
        self.index.entries().skip_values()
    }

    /// Unpacks and returns all stored rows, in insertion order.
    pub fn tuples(&self) -> Result<Vec<Tuple>> {
        self.records
            .iter()
            .map(|row| codec::unpack_tuple(&self.schema, row))
            .collect()
    }

    /// Selects the tuples satisfying an infix condition (see the [`expr`]
    /// module); the empty condition selects everything.
    ///
    /// [`expr`]: expr/index.html
    pub fn select(&self, condition: &str) -> Result<Table> {
        let predicate = Predicate::parse(condition);
        let mut result = self.derived("select");
        for tuple in self.tuples()? {
            if predicate.eval(&self.schema, &tuple)? {
                result.insert(tuple)?;
            }
        }
        Ok(result)
    }

    /// Selects by primary key through the index: the result holds zero or
    /// one tuple.
    pub fn select_key(&self, key: &KeyValue) -> Result<Table> {
        let mut result = self.derived("select");
        if let Some(tuple) = self.get(key)? {
            result.insert(tuple)?;
        }
        Ok(result)
    }

    /// Projects onto the named attributes, in the given order.
    ///
    /// The result keeps this table's primary key when all of its columns
    /// survive the projection; otherwise every projected attribute becomes
    /// part of the key. Rows are not deduplicated.
    pub fn project(&self, names: &[&str]) -> Result<Table> {
        let schema = self.schema.project(names)?;
        let positions: Vec<usize> = names
            .iter()
            .map(|&name| {
                self.schema
                    .position(name)
                    .ok_or_else(|| Error::UnknownAttribute(name.to_owned()))
            })
            .collect::<Result<_>>()?;
        let mut result =
            Table::with_options(format!("{}_project", self.name), schema, self.options);
        for tuple in self.tuples()? {
            result.insert(positions.iter().map(|&i| tuple[i].clone()).collect())?;
        }
        Ok(result)
    }

    /// Returns this table's tuples plus the other table's tuples whose
    /// primary key is absent here. Key membership goes through the index.
    ///
    /// Fails with [`Error::DomainMismatch`] unless the schemas agree
    /// positionally on domains.
    ///
    /// [`Error::DomainMismatch`]: enum.Error.html#variant.DomainMismatch
    pub fn union<S: RecordList>(&self, other: &Table<S>) -> Result<Table> {
        self.check_compatible(other)?;
        let mut result = self.derived("union");
        for tuple in self.tuples()? {
            result.insert(tuple)?;
        }
        for tuple in other.tuples()? {
            let key = self.schema.key_of(&tuple);
            if self.index.get(&key).is_none() {
                result.insert(tuple)?;
            }
        }
        Ok(result)
    }

    /// Returns this table's tuples whose primary key is absent from the
    /// other table. Key membership goes through the other table's index.
    ///
    /// Fails with [`Error::DomainMismatch`] unless the schemas agree
    /// positionally on domains.
    ///
    /// [`Error::DomainMismatch`]: enum.Error.html#variant.DomainMismatch
    pub fn minus<S: RecordList>(&self, other: &Table<S>) -> Result<Table> {
        self.check_compatible(other)?;
        let mut result = self.derived("minus");
        for tuple in self.tuples()? {
            let key = other.schema.key_of(&tuple);
            if other.index.get(&key).is_none() {
                result.insert(tuple)?;
            }
        }
        Ok(result)
    }

    /// Equi-joins this table with `other` on the paired attribute lists.
    ///
    /// The combined schema holds this table's attributes followed by the
    /// other's; a right-hand name already taken on the left is prefixed
    /// with `s.`, the lexical convention the predicate tokenizer passes
    /// through. The result keeps this table's primary key. When the
    /// right-hand columns are exactly the other table's primary key the
    /// join probes its index; otherwise it falls back to a nested loop.
    pub fn join<S: RecordList>(
        &self,
        other: &Table<S>,
        left: &[&str],
        right: &[&str],
    ) -> Result<Table> {
        if left.is_empty() || left.len() != right.len() {
            return Err(Error::DomainMismatch(
                "join requires equally long, non-empty attribute lists".to_owned(),
            ));
        }
        let left_positions: Vec<usize> = left
            .iter()
            .map(|&name| {
                self.schema
                    .position(name)
                    .ok_or_else(|| Error::UnknownAttribute(name.to_owned()))
            })
            .collect::<Result<_>>()?;
        let right_positions: Vec<usize> = right
            .iter()
            .map(|&name| {
                other
                    .schema
                    .position(name)
                    .ok_or_else(|| Error::UnknownAttribute(name.to_owned()))
            })
            .collect::<Result<_>>()?;
        for (&l, &r) in left_positions.iter().zip(&right_positions) {
            let (left_attr, right_attr) =
                (&self.schema.attributes()[l], &other.schema.attributes()[r]);
            if left_attr.domain != right_attr.domain {
                return Err(Error::DomainMismatch(format!(
                    "join pairs `{}` ({:?}) with `{}` ({:?})",
                    left_attr.name, left_attr.domain, right_attr.name, right_attr.domain
                )));
            }
        }

        let mut columns: Vec<Attribute> = self.schema.attributes().to_vec();
        for attribute in other.schema.attributes() {
            let name = if self.schema.position(&attribute.name).is_some() {
                format!("s.{}", attribute.name)
            } else {
                attribute.name.clone()
            };
            columns.push(Attribute::new(name, attribute.domain));
        }
        let key: Vec<&str> = self.schema.key().iter().map(String::as_str).collect();
        let schema = Schema::from_attributes(columns, &key)?;
        let mut result =
            Table::with_options(format!("{}_join", self.name), schema, self.options);

        let right_is_key = right.len() == other.schema.key().len()
            && right
                .iter()
                .zip(other.schema.key())
                .all(|(&name, key_name)| name == key_name);
        if right_is_key {
            for tuple in self.tuples()? {
                let key = KeyValue::new(left_positions.iter().map(|&i| tuple[i].clone()));
                if let Some(matched) = other.get(&key)? {
                    result.insert(tuple.iter().cloned().chain(matched).collect())?;
                }
            }
        } else {
            let right_tuples = other.tuples()?;
            for tuple in self.tuples()? {
                for matched in &right_tuples {
                    let equal = left_positions
                        .iter()
                        .zip(&right_positions)
                        .all(|(&l, &r)| tuple[l] == matched[r]);
                    if equal {
                        result.insert(tuple.iter().chain(matched).cloned().collect())?;
                    }
                }
            }
        }
        Ok(result)
    }

    fn derived(&self, operation: &str) -> Table {
        Table::with_options(
            format!("{}_{}", self.name, operation),
            self.schema.clone(),
            self.options,
        )
    }

    fn check_compatible<S: RecordList>(&self, other: &Table<S>) -> Result<()> {
        if self.schema.len() != other.schema.len() {
            return Err(Error::DomainMismatch(format!(
                "tables have {} and {} attributes",
                self.schema.len(),
                other.schema.len()
            )));
        }
        for (left, right) in self.schema.attributes().iter().zip(other.schema.attributes()) {
            if left.domain != right.domain {
                return Err(Error::DomainMismatch(format!(
                    "attribute `{}` is {:?}, counterpart `{}` is {:?}",
                    left.name, left.domain, right.name, right.domain
                )));
            }
        }
        Ok(())
    }
}
