//! Variable evaluation and `$name` interpolation.

use std::collections::BTreeMap;

use testlang_frontend::ast::{Program, VariableDecl};

/// Flat name -> text mapping built from `var` declarations.
///
/// Later declarations of the same name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    values: BTreeMap<String, String>,
}

impl VariableTable {
    pub fn from_program(program: &Program) -> Self {
        program.variables.iter().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces every `$name` whose name is declared.
    ///
    /// The reference is the whole identifier after `$` (`[A-Za-z_][A-Za-z0-9_]*`),
    /// so `$idx` never matches a variable called `id`. Undeclared references and
    /// a lone `$` stay as written.
    ///
    /// This is not prefix replacement: with `user` declared, `$user_profile`
    /// is left alone rather than becoming `<value>_profile`.
    pub fn substitute(&self, text: &str) -> String {
        if self.values.is_empty() || !text.contains('$') {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(dollar) = rest.find('$') {
            out.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];
            let name_len = identifier_len(after);
            match self.get(&after[..name_len]) {
                Some(value) if name_len > 0 => out.push_str(value),
                _ => {
                    out.push('$');
                    out.push_str(&after[..name_len]);
                }
            }
            rest = &after[name_len..];
        }
        out.push_str(rest);
        out
    }
}

impl<'a> FromIterator<&'a VariableDecl> for VariableTable {
    fn from_iter<I: IntoIterator<Item = &'a VariableDecl>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|decl| (decl.name.clone(), decl.value.to_string()))
            .collect();
        Self { values }
    }
}

/// Byte length of the identifier at the start of `s`, or 0.
fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
