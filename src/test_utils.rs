//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される型解決・コンパイラのフェイク実装を提供します。
#![cfg(test)]

use std::any::Any;
use std::cell::RefCell;
use std::collections::{
    BTreeMap,
    VecDeque,
};
use std::rc::Rc;

use crate::host::compiler::{
    Arg,
    CallableUnit,
    CompileOutput,
    CompileRequest,
    Compiler,
    Diagnostic,
    InvokeError,
    signature,
};
use crate::host::types::{
    TypeDescriptor,
    TypeResolver,
};

/// 登録された型とメンバーだけを知っている型解決
#[derive(Debug, Default)]
pub(crate) struct FakeTypes {
    /// クラス名 → (型情報, メンバーパス)
    types: BTreeMap<String, (TypeDescriptor, Vec<String>)>,
}

impl FakeTypes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 型を登録する
    pub(crate) fn with_type(mut self, descriptor: TypeDescriptor, members: &[&str]) -> Self {
        let members = members.iter().map(ToString::to_string).collect();
        self.types.insert(descriptor.name.clone(), (descriptor, members));
        self
    }
}

impl TypeResolver for FakeTypes {
    fn find_type(&self, class_name: &str) -> Option<TypeDescriptor> {
        self.types.get(class_name).map(|(descriptor, _)| descriptor.clone())
    }

    fn member_exists(&self, member_path: &str, descriptor: &TypeDescriptor) -> bool {
        self.types
            .get(&descriptor.name)
            .is_some_and(|(_, members)| members.iter().any(|member| member == member_path))
    }
}

/// エントリポイント呼び出しの記録（`"Translate(String, Translation)"` 形式）
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

/// 呼び出しを記録するだけの実行単位
///
/// `Translate*` はオブジェクト引数が `String` なら `"<language>:<value>"` に書き換え、
/// `Create*` はクラス名を `String` で返す。
#[derive(Debug)]
pub(crate) struct RecordingUnit {
    /// 共有の呼び出し記録
    calls: CallLog,
    /// 受け付けるエントリポイントのシグネチャ
    entry_points: Vec<String>,
}

impl RecordingUnit {
    pub(crate) fn new(calls: CallLog, entry_points: &[&str]) -> Self {
        Self { calls, entry_points: entry_points.iter().map(ToString::to_string).collect() }
    }
}

impl CallableUnit for RecordingUnit {
    fn invoke(
        &self,
        entry_point: &str,
        args: &mut [Arg<'_>],
    ) -> Result<Option<Box<dyn Any>>, InvokeError> {
        let call = format!("{entry_point}({})", signature(args));
        if !self.entry_points.contains(&call) {
            return Err(InvokeError::not_found(entry_point, args));
        }
        self.calls.borrow_mut().push(call);

        let language = args.iter().find_map(|arg| match arg {
            Arg::Language(language) => Some((*language).to_string()),
            _ => None,
        });
        for arg in args.iter_mut() {
            if let Arg::Object(object) = arg
                && let Some(text) = object.downcast_mut::<String>()
                && entry_point == "Translate"
            {
                *text = format!("{}:{text}", language.as_deref().unwrap_or("?"));
            }
        }

        Ok(entry_point
            .strip_prefix("Create")
            .map(|class_name| Box::new(class_name.to_string()) as Box<dyn Any>))
    }
}

/// 予め決めた診断を順に返すコンパイラ
///
/// 診断が空（またはスクリプトが尽きた）場合は [`RecordingUnit`] を返して成功する。
#[derive(Debug)]
pub(crate) struct ScriptedCompiler {
    /// 各コンパイルで返す診断
    script: RefCell<VecDeque<Vec<Diagnostic>>>,
    /// 受け取ったリクエスト
    requests: Rc<RefCell<Vec<CompileRequest>>>,
    /// 生成する実行単位と共有する呼び出し記録
    calls: CallLog,
    /// 生成する実行単位のエントリポイント
    entry_points: Vec<&'static str>,
    /// `runtime_version` の戻り値
    runtime: Option<String>,
}

/// 既定の実行単位が受け付けるエントリポイント
pub(crate) const ENTRY_POINTS: &[&str] = &[
    "Translate(Translation)",
    "Translate(String, Translation)",
    "Translate(String, Object, Translation)",
    "Restore(Translation)",
    "Restore(Object, Translation)",
    "CreateForm1()",
];

impl ScriptedCompiler {
    pub(crate) fn new() -> Self {
        Self {
            script: RefCell::new(VecDeque::new()),
            requests: Rc::default(),
            calls: Rc::default(),
            entry_points: ENTRY_POINTS.to_vec(),
            runtime: None,
        }
    }

    /// 次のコンパイルを `diagnostics` で失敗させる
    pub(crate) fn failing_with(self, diagnostics: Vec<Diagnostic>) -> Self {
        self.script.borrow_mut().push_back(diagnostics);
        self
    }

    pub(crate) fn with_runtime(mut self, version: &str) -> Self {
        self.runtime = Some(version.to_string());
        self
    }

    pub(crate) fn requests(&self) -> Rc<RefCell<Vec<CompileRequest>>> {
        Rc::clone(&self.requests)
    }

    pub(crate) fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }
}

impl Compiler for ScriptedCompiler {
    fn compile(&self, request: &CompileRequest) -> CompileOutput {
        self.requests.borrow_mut().push(request.clone());
        match self.script.borrow_mut().pop_front() {
            Some(diagnostics) if !diagnostics.is_empty() => CompileOutput::failure(diagnostics),
            _ => CompileOutput::success(Box::new(RecordingUnit::new(
                Rc::clone(&self.calls),
                &self.entry_points,
            ))),
        }
    }

    fn runtime_version(&self) -> Option<String> {
        self.runtime.clone()
    }
}
