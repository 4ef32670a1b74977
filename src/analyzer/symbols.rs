// src/analyzer/symbols.rs

use super::trace::TraceLog;
use super::types::{DataType, NodeKind, TokenClass};
use std::fmt;
use std::fmt::Write as _;

/// 每个作用域的桶数。哈希是名字的字节值求和取模，
/// 桶数固定使得同一串插入在任何一次运行里都落进同样的链。
pub const BUCKET_COUNT: usize = 7;

/// 函数签名中的一个形参。原型形式允许省略形参名。
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub data_type: DataType,
    pub name: Option<String>,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.data_type, name),
            None => write!(f, "{}", self.data_type),
        }
    }
}

/// 符号表中存储的一条记录：一个已声明名字的完整描述。
/// 插入之后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRecord {
    pub name: String,
    /// 原始 Token 的词法类别，仅保留语法树标注。
    pub token_kind: TokenClass,
    /// 这条记录扮演的角色：变量、数组或函数。
    pub node_kind: NodeKind,
    /// 变量：声明类型。数组：元素类型。函数：返回类型。
    pub data_type: DataType,
    /// 仅函数记录使用，冗余镜像 `data_type`。
    pub return_type: Option<DataType>,
    /// 函数的形参列表，按声明顺序。
    pub parameters: Vec<Parameter>,
    /// 仅数组记录使用。
    pub array_size: Option<u32>,
}

impl SymbolRecord {
    pub fn variable(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            token_kind: TokenClass::Identifier,
            node_kind: NodeKind::Variable,
            data_type,
            return_type: None,
            parameters: Vec::new(),
            array_size: None,
        }
    }

    pub fn array(name: impl Into<String>, element_type: DataType, size: u32) -> Self {
        Self {
            name: name.into(),
            token_kind: TokenClass::Identifier,
            node_kind: NodeKind::Array,
            data_type: element_type,
            return_type: None,
            parameters: Vec::new(),
            array_size: Some(size),
        }
    }

    pub fn function(
        name: impl Into<String>,
        return_type: DataType,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            name: name.into(),
            token_kind: TokenClass::Identifier,
            node_kind: NodeKind::Function,
            data_type: return_type,
            return_type: Some(return_type),
            parameters,
            array_size: None,
        }
    }
}

// 作用域转储里每条记录的渲染格式
impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.name, self.data_type, self.node_kind)?;
        if let Some(size) = self.array_size {
            write!(f, " [size={}]", size)?;
        }
        if self.node_kind == NodeKind::Function {
            let params = self
                .parameters
                .iter()
                .map(Parameter::to_string)
                .collect::<Vec<_>>()
                .join(",");
            write!(f, " [params=({})]", params)?;
        }
        Ok(())
    }
}

/// 代表一个独立的作用域，例如一个函数体或一个嵌套代码块。
///
/// 名字到记录的映射用定长桶数组加链实现：桶内保持插入顺序，
/// 这让作用域转储的输出完全可复现；整个作用域退出时记录随之整体释放。
#[derive(Debug)]
pub struct Scope {
    pub scope_id: u32,
    buckets: Vec<Vec<SymbolRecord>>,
}

impl Scope {
    fn new(scope_id: u32) -> Self {
        Self {
            scope_id,
            buckets: (0..BUCKET_COUNT).map(|_| Vec::new()).collect(),
        }
    }

    /// 哈希函数：名字所有字节值求和，对桶数取模。
    fn bucket_of(name: &str) -> usize {
        name.bytes().map(usize::from).sum::<usize>() % BUCKET_COUNT
    }

    fn get(&self, name: &str) -> Option<&SymbolRecord> {
        self.buckets[Self::bucket_of(name)]
            .iter()
            .find(|record| record.name == name)
    }

    /// 插入一条记录。同名记录已存在时不做任何修改并返回 false。
    fn insert(&mut self, record: SymbolRecord) -> bool {
        if self.get(&record.name).is_some() {
            return false;
        }
        self.buckets[Self::bucket_of(&record.name)].push(record);
        true
    }

    /// 把整个作用域渲染成转储文本，逐桶输出链上的记录。
    fn render_dump(&self) -> String {
        let mut out = format!("ScopeTable # {}", self.scope_id);
        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let chain = bucket
                .iter()
                .map(|record| format!("<{}>", record))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, "\n {} --> {}", index, chain);
        }
        out
    }
}

/// 符号表门面：一个作用域栈。
///
/// 栈底（下标 0）是全局作用域，在构造时创建；栈顶是当前作用域。
/// 查找自顶向下，第一个命中者生效——这就是遮蔽。
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    next_scope_id: u32,
}

impl SymbolTable {
    /// 创建一个新的符号表，并自动进入全局作用域。
    pub fn new() -> Self {
        let mut table = Self {
            scopes: Vec::new(),
            next_scope_id: 1,
        };
        table.enter_scope(); // Enter the global scope
        table
    }

    /// 进入一个新的作用域（例如，进入一个函数体或代码块）。
    pub fn enter_scope(&mut self) {
        let scope = Scope::new(self.next_scope_id);
        self.next_scope_id += 1;
        self.scopes.push(scope);
    }

    /// 退出当前作用域：先把它转储到日志，再弹出并释放全部记录。
    /// 只剩全局作用域时不得调用。
    pub fn exit_scope(&mut self, sink: &mut TraceLog) {
        debug_assert!(
            self.scopes.len() > 1,
            "exit_scope called with only the global scope remaining"
        );
        if self.scopes.len() > 1 {
            self.print_current_scope(sink);
            self.scopes.pop();
        }
    }

    /// 在当前作用域中添加一条记录。
    /// 同名记录已存在时返回 false；重复声明的诊断由调用方负责。
    pub fn insert(&mut self, record: SymbolRecord) -> bool {
        debug_assert!(!record.name.is_empty(), "symbol records must carry a name");
        let current_scope = self
            .scopes
            .last_mut()
            .expect("SymbolTable should always have at least one scope");
        current_scope.insert(record)
    }

    /// 查找一个名字（从内到外），返回第一个命中的记录。
    pub fn lookup(&self, name: &str) -> Option<&SymbolRecord> {
        for scope in self.scopes.iter().rev() {
            if let Some(record) = scope.get(name) {
                return Some(record);
            }
        }
        None
    }

    /// 只在当前作用域中查找。
    pub fn lookup_current_scope(&self, name: &str) -> Option<&SymbolRecord> {
        self.scopes
            .last()
            .expect("SymbolTable should always have at least one scope")
            .get(name)
    }

    /// 把当前作用域转储到日志。
    pub fn print_current_scope(&self, sink: &mut TraceLog) {
        let scope = self
            .scopes
            .last()
            .expect("SymbolTable should always have at least one scope");
        sink.scope_dump(scope.render_dump());
    }

    /// 把所有存活的作用域自底向上转储到日志。
    pub fn print_all_scopes(&self, sink: &mut TraceLog) {
        for scope in &self.scopes {
            sink.scope_dump(scope.render_dump());
        }
    }

    /// 当前作用域栈的深度（全局作用域算 1）。
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// 当前作用域的编号。
    pub fn current_scope_id(&self) -> u32 {
        self.scopes
            .last()
            .expect("SymbolTable should always have at least one scope")
            .scope_id
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
