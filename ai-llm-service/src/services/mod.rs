pub mod hugging_face_service;
