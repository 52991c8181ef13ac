//! 预导入模块，方便使用

pub use super::activities::{
    ActiveModel as ActivityActiveModel, Entity as Activities, Model as ActivityModel,
};
pub use super::activity_graders::{
    ActiveModel as ActivityGraderActiveModel, Entity as ActivityGraders,
    Model as ActivityGraderModel,
};
pub use super::criteria::{
    ActiveModel as CriterionActiveModel, Entity as Criteria, Model as CriterionModel,
};
pub use super::grader_comments::{
    ActiveModel as GraderCommentActiveModel, Entity as GraderComments,
    Model as GraderCommentModel,
};
pub use super::grader_submission_status::{
    ActiveModel as SubmissionStatusActiveModel, Entity as GraderSubmissionStatus,
    Model as SubmissionStatusModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::grading_scale::{Entity as GradingScale, Model as GradingScaleModel};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
