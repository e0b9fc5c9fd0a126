//! Module-level symbol table of a loaded target.
//!
//! Answers two questions for the analysis:
//! - which string constant a top-level name (local or imported) denotes;
//! - which members a named type declares, for receiver conformance.
//!
//! Imports are only followed between files of the target itself. A name
//! imported from anywhere else resolves to nothing.

pub mod declarations;
pub mod eval;
pub mod scope;

use std::{
    collections::{HashMap, HashSet},
    path::{Component, Path, PathBuf},
};

use swc_ecma_ast::{
    ClassMember, Decl, Expr, ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem,
    PropName, Stmt, TsExprWithTypeArgs, TsInterfaceDecl, TsType, TsTypeAliasDecl, TsTypeElement,
    TsUnionOrIntersectionType,
};

use crate::symbols::declarations::{
    Declaration, Declared, collect_decl, collect_hoisted_vars, init_type_name,
};
use crate::symbols::eval::{eval_const_string, unwrap_ts_expr};

/// Source extensions tried when an import specifier omits one.
const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// What is statically known about a bound name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    /// Folded value when the name is a `const` string.
    pub constant: Option<String>,
    /// Declared or inferred type name.
    pub type_name: Option<String>,
}

#[derive(Debug, Default)]
struct TypeMembers {
    members: HashSet<String>,
    parents: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    files: Vec<HashMap<String, Binding>>,
    types: HashMap<String, TypeMembers>,
}

impl SymbolTable {
    /// Build the table for a set of parsed files. File indices follow the
    /// order of `files`.
    pub fn build(files: &[(&Path, &Module)]) -> Self {
        let index: HashMap<PathBuf, usize> = files
            .iter()
            .enumerate()
            .map(|(i, (path, _))| (normalize_path(path), i))
            .collect();

        let mut types = HashMap::new();
        let raw: Vec<RawFile> = files
            .iter()
            .map(|(path, module)| {
                collect_types(module, &mut types);
                RawFile::collect(path, module, &index)
            })
            .collect();

        let mut resolver = Resolver {
            raw: &raw,
            locals: HashMap::new(),
            exports: HashMap::new(),
            visiting: HashSet::new(),
        };
        let resolved = raw
            .iter()
            .enumerate()
            .map(|(file, raw_file)| {
                raw_file
                    .bindings
                    .keys()
                    .map(|name| (name.clone(), resolver.local(file, name)))
                    .collect()
            })
            .collect();

        Self {
            files: resolved,
            types,
        }
    }

    /// Top-level binding of `name` in `file`, if the file declares or imports it.
    pub fn module_binding(&self, file: usize, name: &str) -> Option<&Binding> {
        self.files.get(file)?.get(name)
    }

    /// String value of a top-level constant visible in `file`.
    pub fn constant(&self, file: usize, name: &str) -> Option<&str> {
        self.module_binding(file, name)?.constant.as_deref()
    }

    /// Whether `type_name`, or any type it extends, declares `member`.
    pub fn declares(&self, type_name: &str, member: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![type_name];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(entry) = self.types.get(current) else {
                continue;
            };
            if entry.members.contains(member) {
                return true;
            }
            stack.extend(entry.parents.iter().map(String::as_str));
        }
        false
    }
}

#[derive(Debug)]
enum RawBinding<'a> {
    Local(Declaration<'a>),
    Import {
        source: Option<usize>,
        name: String,
    },
    Namespace,
}

#[derive(Debug)]
enum RawExport<'a> {
    Local(String),
    Reexport { source: usize, name: String },
    Default(&'a Expr),
}

#[derive(Debug, Default)]
struct RawFile<'a> {
    bindings: HashMap<String, RawBinding<'a>>,
    exports: HashMap<String, RawExport<'a>>,
    star_exports: Vec<usize>,
}

impl<'a> RawFile<'a> {
    fn collect(path: &Path, module: &'a Module, index: &HashMap<PathBuf, usize>) -> Self {
        let mut raw = RawFile::default();
        let mut declarations = Vec::new();

        for item in &module.body {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => collect_decl(decl, &mut declarations),
                ModuleItem::Stmt(stmt) => collect_hoisted_vars(stmt, &mut declarations),
                ModuleItem::ModuleDecl(module_decl) => {
                    raw.collect_module_decl(path, module_decl, index, &mut declarations)
                }
            }
        }

        for declaration in declarations {
            raw.bindings
                .insert(declaration.name.clone(), RawBinding::Local(declaration));
        }
        raw
    }

    fn collect_module_decl(
        &mut self,
        path: &Path,
        module_decl: &'a ModuleDecl,
        index: &HashMap<PathBuf, usize>,
        declarations: &mut Vec<Declaration<'a>>,
    ) {
        match module_decl {
            ModuleDecl::Import(import) => {
                let source = str_value(&import.src).and_then(|s| resolve_module(path, s, index));
                for specifier in &import.specifiers {
                    let (local, binding) = match specifier {
                        ImportSpecifier::Named(named) => {
                            let name = named
                                .imported
                                .as_ref()
                                .and_then(export_name)
                                .unwrap_or_else(|| named.local.sym.to_string());
                            (&named.local, RawBinding::Import { source, name })
                        }
                        ImportSpecifier::Default(default) => (
                            &default.local,
                            RawBinding::Import {
                                source,
                                name: "default".to_string(),
                            },
                        ),
                        ImportSpecifier::Namespace(namespace) => {
                            (&namespace.local, RawBinding::Namespace)
                        }
                    };
                    self.bindings.insert(local.sym.to_string(), binding);
                }
            }
            ModuleDecl::ExportDecl(export) => {
                let start = declarations.len();
                collect_decl(&export.decl, declarations);
                for declaration in &declarations[start..] {
                    self.exports.insert(
                        declaration.name.clone(),
                        RawExport::Local(declaration.name.clone()),
                    );
                }
            }
            ModuleDecl::ExportNamed(named) => {
                let source = named
                    .src
                    .as_ref()
                    .and_then(|src| str_value(src))
                    .and_then(|s| resolve_module(path, s, index));
                for specifier in &named.specifiers {
                    let swc_ecma_ast::ExportSpecifier::Named(spec) = specifier else {
                        continue;
                    };
                    let Some(orig) = export_name(&spec.orig) else {
                        continue;
                    };
                    let exported = spec
                        .exported
                        .as_ref()
                        .and_then(export_name)
                        .unwrap_or_else(|| orig.clone());
                    let export = match (&named.src, source) {
                        (None, _) => RawExport::Local(orig),
                        (Some(_), Some(source)) => RawExport::Reexport { source, name: orig },
                        (Some(_), None) => continue,
                    };
                    self.exports.insert(exported, export);
                }
            }
            ModuleDecl::ExportDefaultExpr(export) => {
                self.exports
                    .insert("default".to_string(), RawExport::Default(&export.expr));
            }
            ModuleDecl::ExportAll(all) => {
                if let Some(source) =
                    str_value(&all.src).and_then(|s| resolve_module(path, s, index))
                {
                    self.star_exports.push(source);
                }
            }
            _ => {}
        }
    }
}

/// Resolves bindings across files with memoization. Cycles resolve to an
/// empty binding.
struct Resolver<'r, 'a> {
    raw: &'r [RawFile<'a>],
    locals: HashMap<(usize, String), Binding>,
    exports: HashMap<(usize, String), Binding>,
    visiting: HashSet<(usize, String, bool)>,
}

impl Resolver<'_, '_> {
    fn local(&mut self, file: usize, name: &str) -> Binding {
        let key = (file, name.to_string());
        if let Some(binding) = self.locals.get(&key) {
            return binding.clone();
        }
        if !self.visiting.insert((file, name.to_string(), false)) {
            return Binding::default();
        }

        let raw = self.raw;
        let binding = match raw[file].bindings.get(name) {
            Some(RawBinding::Local(declaration)) => {
                let constant = match declaration.declared {
                    Declared::Const(init) => {
                        eval_const_string(init, &mut |reference| self.local(file, reference).constant)
                    }
                    Declared::Other => None,
                };
                Binding {
                    constant,
                    type_name: declaration.type_name.clone(),
                }
            }
            Some(RawBinding::Import {
                source: Some(source),
                name,
            }) => self.export(*source, name),
            Some(RawBinding::Import { source: None, .. } | RawBinding::Namespace) | None => {
                Binding::default()
            }
        };

        self.visiting.remove(&(file, name.to_string(), false));
        self.locals.insert(key, binding.clone());
        binding
    }

    fn export(&mut self, file: usize, name: &str) -> Binding {
        let key = (file, name.to_string());
        if let Some(binding) = self.exports.get(&key) {
            return binding.clone();
        }
        if !self.visiting.insert((file, name.to_string(), true)) {
            return Binding::default();
        }

        let raw = self.raw;
        let binding = match raw[file].exports.get(name) {
            Some(RawExport::Local(local)) => self.local(file, local),
            Some(RawExport::Reexport { source, name }) => self.export(*source, name),
            Some(RawExport::Default(expr)) => Binding {
                constant: eval_const_string(expr, &mut |reference| {
                    self.local(file, reference).constant
                }),
                type_name: init_type_name(expr).or_else(|| match expr {
                    Expr::Ident(ident) => self.local(file, &ident.sym).type_name,
                    _ => None,
                }),
            },
            // `export *` never re-exports a default.
            None if name != "default" => raw[file]
                .star_exports
                .iter()
                .map(|source| self.export(*source, name))
                .find(|binding| *binding != Binding::default())
                .unwrap_or_default(),
            None => Binding::default(),
        };

        self.visiting.remove(&(file, name.to_string(), true));
        self.exports.insert(key, binding.clone());
        binding
    }
}

fn str_value(value: &swc_ecma_ast::Str) -> Option<&str> {
    value.value.as_str()
}

fn export_name(name: &ModuleExportName) -> Option<String> {
    match name {
        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
        ModuleExportName::Str(s) => s.value.as_str().map(str::to_string),
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into their
/// parent where possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve a relative import specifier to one of the loaded files.
///
/// Tries the path as written, with each source extension appended, the
/// TypeScript file behind a `.js`-style specifier, and finally an `index`
/// file inside a directory.
pub fn resolve_module(
    current_file: &Path,
    specifier: &str,
    index: &HashMap<PathBuf, usize>,
) -> Option<usize> {
    if !specifier.starts_with('.') {
        return None;
    }

    let base_dir = current_file.parent()?;
    let resolved = normalize_path(&base_dir.join(specifier));
    let lookup = |candidate: PathBuf| index.get(&candidate).copied();

    if let Some(found) = lookup(resolved.clone()) {
        return Some(found);
    }

    let as_string = resolved.to_string_lossy().to_string();
    for ext in RESOLVE_EXTENSIONS {
        if let Some(found) = lookup(PathBuf::from(format!("{}.{}", as_string, ext))) {
            return Some(found);
        }
    }

    let script_to_ts: &[(&str, &[&str])] = &[
        ("js", &["ts", "tsx"]),
        ("jsx", &["tsx"]),
        ("mjs", &["mts"]),
        ("cjs", &["cts"]),
    ];
    if let Some(ext) = resolved.extension().and_then(|e| e.to_str()) {
        for (script, typed) in script_to_ts {
            if ext != *script {
                continue;
            }
            for typed_ext in *typed {
                if let Some(found) = lookup(resolved.with_extension(typed_ext)) {
                    return Some(found);
                }
            }
        }
    }

    RESOLVE_EXTENSIONS
        .iter()
        .find_map(|ext| lookup(resolved.join(format!("index.{}", ext))))
}

fn member_key_name(key: &Expr) -> Option<String> {
    match unwrap_ts_expr(key) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Lit(swc_ecma_ast::Lit::Str(s)) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

fn heritage_name(expr: &Expr) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => member.prop.as_ident().map(|p| p.sym.to_string()),
        _ => None,
    }
}

fn heritage_names(clauses: &[TsExprWithTypeArgs]) -> impl Iterator<Item = String> + '_ {
    clauses.iter().filter_map(|clause| heritage_name(&clause.expr))
}

fn type_elements(elements: &[TsTypeElement], entry: &mut TypeMembers) {
    for element in elements {
        let key = match element {
            TsTypeElement::TsMethodSignature(method) => &method.key,
            TsTypeElement::TsPropertySignature(prop) => &prop.key,
            _ => continue,
        };
        if let Some(name) = member_key_name(key) {
            entry.members.insert(name);
        }
    }
}

fn collect_type_shape(ts_type: &TsType, entry: &mut TypeMembers) {
    match ts_type {
        TsType::TsTypeLit(lit) => type_elements(&lit.members, entry),
        TsType::TsTypeRef(type_ref) => entry
            .parents
            .push(declarations::entity_name(&type_ref.type_name)),
        TsType::TsParenthesizedType(paren) => collect_type_shape(&paren.type_ann, entry),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
            intersection,
        )) => {
            for member in &intersection.types {
                collect_type_shape(member, entry);
            }
        }
        _ => {}
    }
}

fn collect_interface(interface: &TsInterfaceDecl, types: &mut HashMap<String, TypeMembers>) {
    let entry = types.entry(interface.id.sym.to_string()).or_default();
    type_elements(&interface.body.body, entry);
    entry.parents.extend(heritage_names(&interface.extends));
}

fn collect_alias(alias: &TsTypeAliasDecl, types: &mut HashMap<String, TypeMembers>) {
    let entry = types.entry(alias.id.sym.to_string()).or_default();
    collect_type_shape(&alias.type_ann, entry);
}

fn collect_class(name: String, class: &swc_ecma_ast::Class, types: &mut HashMap<String, TypeMembers>) {
    let entry = types.entry(name).or_default();
    for member in &class.body {
        let key = match member {
            ClassMember::Method(method) => prop_name(&method.key),
            ClassMember::ClassProp(prop) => prop_name(&prop.key),
            _ => None,
        };
        if let Some(key) = key {
            entry.members.insert(key);
        }
    }
    if let Some(parent) = class.super_class.as_deref().and_then(heritage_name) {
        entry.parents.push(parent);
    }
    entry.parents.extend(heritage_names(&class.implements));
}

fn collect_type_decl(decl: &Decl, types: &mut HashMap<String, TypeMembers>) {
    match decl {
        Decl::TsInterface(interface) => collect_interface(interface, types),
        Decl::TsTypeAlias(alias) => collect_alias(alias, types),
        Decl::Class(class) => collect_class(class.ident.sym.to_string(), &class.class, types),
        _ => {}
    }
}

/// Record every interface, class and type alias declared at the top level.
fn collect_types(module: &Module, types: &mut HashMap<String, TypeMembers>) {
    for item in &module.body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => collect_type_decl(decl, types),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_type_decl(&export.decl, types)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                swc_ecma_ast::DefaultDecl::Class(class) => {
                    if let Some(ident) = &class.ident {
                        collect_class(ident.sym.to_string(), &class.class, types);
                    }
                }
                swc_ecma_ast::DefaultDecl::TsInterfaceDecl(interface) => {
                    collect_interface(interface, types)
                }
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
