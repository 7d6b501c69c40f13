pub mod result_image;
