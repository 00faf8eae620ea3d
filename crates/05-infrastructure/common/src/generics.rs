//! 泛型类型参数替换

use crate::metadata::{TypeArg, TypeBase, TypeKey, TypeName};
use std::collections::HashMap;

/// 形式类型参数到具体类型实参的映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    bindings: HashMap<TypeName, TypeArg>,
}

impl SubstitutionMap {
    /// 空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 由声明的形式参数与请求类型的实参构建映射
    ///
    /// 形参按声明顺序与实参一一对应。任一侧为空或数量不一致时返回空映射，
    /// 此时该声明按非泛型处理。
    pub fn for_request(formal_params: &[TypeName], requested: &TypeKey) -> Self {
        let args = requested.args();
        if formal_params.is_empty() || args.is_empty() || formal_params.len() != args.len() {
            return Self::new();
        }

        Self {
            bindings: formal_params
                .iter()
                .cloned()
                .zip(args.iter().cloned())
                .collect(),
        }
    }

    /// 绑定一个形参
    pub fn bind(mut self, param: impl Into<TypeName>, arg: impl Into<TypeArg>) -> Self {
        self.bindings.insert(param.into(), arg.into());
        self
    }

    pub fn get(&self, param: &str) -> Option<&TypeArg> {
        self.bindings.get(param)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

/// 用映射替换类型键中的形参引用
///
/// - 形参引用整体替换为映射值；未映射或映射为 `*` 时保持不变。`T?` 替换后保持可空。
/// - 带实参的类型递归替换每个实参，保留基础类型和可空标记。
/// - 其他类型原样返回。
pub fn substitute(ty: &TypeKey, mapping: &SubstitutionMap) -> TypeKey {
    if let TypeBase::Param(name) = ty.base() {
        return match mapping.get(name).and_then(TypeArg::as_type) {
            Some(replacement) if ty.is_nullable() => replacement.clone().nullable(),
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        };
    }

    if ty.args().is_empty() || mapping.is_empty() {
        return ty.clone();
    }

    let args = ty
        .args()
        .iter()
        .map(|arg| match arg {
            TypeArg::Star => TypeArg::Star,
            TypeArg::Type(inner) => TypeArg::Type(substitute(inner, mapping)),
        })
        .collect();

    ty.rebuild(args)
}
