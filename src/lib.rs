//! GAMS - 小组活动评分系统后端服务
//!
//! 基于 Actix Web 构建：教师创建评分活动并按加权标准打出字母等级，
//! 学生自行组队并在评分人提交后查看成绩。
//!
//! # 架构
//! - `cache`: 用户资料缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 评分引擎（等级换算、加权汇总、提交状态、进度报告、成员校验）
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
